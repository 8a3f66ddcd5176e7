use parley_pattern::Segment;

use super::{Frame, Interpreter};
use crate::{Element, EvalError, Substitutions, Tag, UNKNOWN, WordMaps};

impl Interpreter<'_> {
    /// `<star>`, `<thatstar>` and `<topicstar>`. Out of range reads empty.
    pub(super) fn star(
        &mut self,
        tag: Tag,
        segment: Segment,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        let index = self.index(tag, element, frame)?;
        Ok(frame.star(segment, index).trim().to_owned())
    }

    /// `<that index="M,N"/>`: sentence N of the reply M requests back.
    pub(super) fn that(&mut self, element: &Element, frame: &mut Frame) -> Result<String, EvalError> {
        let (request, sentence) = match self.attribute_or_child(element, "index", frame)? {
            None => (1, 1),
            Some(value) => index_pair(&value)
                .ok_or_else(|| EvalError::tag("that", format!("bad index {value:?}")))?,
        };
        Ok(self
            .session
            .that(request, sentence)
            .unwrap_or(UNKNOWN)
            .trim()
            .to_owned())
    }

    /// `<input>`, `<request>` and `<response>`.
    pub(super) fn history(
        &mut self,
        tag: Tag,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        let index = self.index(tag, element, frame)?;
        let item = match tag {
            Tag::Request => self.session.request(index),
            Tag::Response => self.session.response(index),
            _ => self.session.input(index),
        };
        Ok(item.unwrap_or(UNKNOWN).trim().to_owned())
    }

    pub(super) fn bot_property(
        &mut self,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        Ok(match self.attribute_or_child(element, "name", frame)? {
            Some(name) => self.bot.property(&name).trim().to_owned(),
            None => UNKNOWN.to_owned(),
        })
    }

    /// `<map name>` looks the content up; without a name the tag is passed
    /// through for the host.
    pub(super) fn map(&mut self, element: &Element, frame: &mut Frame) -> Result<String, EvalError> {
        let name = self.attribute_or_child(element, "name", frame)?;
        let key = self.eval_content_except(element, frame, &["name"])?;
        let key = key.trim();
        Ok(match name {
            None => format!("<map>{key}</map>"),
            Some(name) => self
                .bot
                .maps()
                .get(&name, &key.to_uppercase())
                .map(|value| value.trim().to_owned())
                .unwrap_or_else(|| UNKNOWN.to_owned()),
        })
    }

    /// `<normalize>`, `<denormalize>`, `<person>`, `<person2>` and
    /// `<gender>`. An empty `<person/>` or `<person2/>` works on star 1.
    pub(super) fn substitute(
        &mut self,
        table: Substitutions,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        let text = match table {
            Substitutions::Person | Substitutions::Person2 if element.children.is_empty() => {
                frame.star(Segment::Input, 1).to_owned()
            }
            _ => self.eval_content(element, frame)?,
        };
        let preprocessor = self.bot.preprocessor();
        Ok(match table {
            Substitutions::Normal => preprocessor.normalize(&text),
            table => preprocessor.table(table).apply(&text),
        })
    }

    /// A 1-based `index` parameter, 1 when absent.
    fn index(&mut self, tag: Tag, element: &Element, frame: &mut Frame) -> Result<usize, EvalError> {
        match self.attribute_or_child(element, "index", frame)? {
            None => Ok(1),
            Some(value) => value
                .trim()
                .parse()
                .map_err(|error| EvalError::tag(tag.name(), format!("bad index {value:?}: {error}"))),
        }
    }
}

fn index_pair(value: &str) -> Option<(usize, usize)> {
    let mut parts = value.split(',');
    let request = parts.next()?.trim().parse().ok()?;
    let sentence = match parts.next() {
        Some(sentence) => sentence.trim().parse().ok()?,
        None => 1,
    };
    Some((request, sentence))
}

#[cfg(test)]
mod tests {
    use super::index_pair;

    #[test]
    fn it_reads_index_pairs() {
        assert_eq!(index_pair("2,3"), Some((2, 3)));
        assert_eq!(index_pair(" 2 "), Some((2, 1)));
        assert_eq!(index_pair("two"), None);
    }
}
