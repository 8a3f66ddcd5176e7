use parley_pattern::Category;
use quick_xml::escape::escape;

use super::{Frame, Interpreter};
use crate::{Element, EvalError, Learned, Node};

impl Interpreter<'_> {
    /// `<learn>` and `<learnf>`: adds the enclosed categories to the brain.
    ///
    /// The category markup is kept as written except for `<eval>` elements,
    /// which are evaluated now. Learned rules have topic `*`.
    pub(super) fn learn(
        &mut self,
        element: &Element,
        frame: &mut Frame,
        kind: Learned,
    ) -> Result<String, EvalError> {
        for category in element.elements().filter(|child| child.name == "category") {
            let mut pattern = String::new();
            let mut that = "*".to_owned();
            let mut template = String::new();
            for part in category.elements() {
                match part.name.as_str() {
                    "pattern" => pattern = self.unevaluated(part, frame, false)?,
                    "that" => that = self.unevaluated(part, frame, false)?,
                    "template" => template = self.unevaluated(part, frame, true)?,
                    _ => {}
                }
            }

            let filename = match kind {
                Learned::Session => "learn",
                Learned::Persistent => "learnf",
            };
            self.bot.learn(
                Category::new(&pattern, &that, "*", &template).with_filename(filename),
                kind,
            );
        }
        Ok(String::new())
    }

    pub(super) fn reset_learned(&mut self, kind: Learned) -> Result<String, EvalError> {
        self.bot.reset_learned(kind);
        Ok(match kind {
            Learned::Session => "Deleted Learn Categories",
            Learned::Persistent => "Deleted Learnf Categories",
        }
        .to_owned())
    }

    /// Re-serializes an element's content, evaluating only `<eval>`. Text is
    /// escaped when the result will be parsed as markup again.
    fn unevaluated(
        &mut self,
        element: &Element,
        frame: &mut Frame,
        as_markup: bool,
    ) -> Result<String, EvalError> {
        let mut output = String::new();
        for child in &element.children {
            match child {
                Node::Text(text) if as_markup => output.push_str(&escape(text.as_str())),
                Node::Text(text) => output.push_str(text),
                Node::Element(inner) if inner.name == "eval" => {
                    let evaluated = self.eval_content(inner, frame)?;
                    if as_markup {
                        output.push_str(&escape(evaluated.as_str()));
                    } else {
                        output.push_str(&evaluated);
                    }
                }
                Node::Element(inner) => {
                    let content = self.unevaluated(inner, frame, as_markup)?;
                    output.push_str(&inner.wrap(&content));
                }
            }
        }
        Ok(output)
    }
}
