//! The template interpreter.
//!
//! A template is parsed into an element tree and evaluated depth-first.
//! Text is copied through, built-in [`Tag`]s are evaluated by their handlers,
//! registered extensions get the elements they claim, and anything else is
//! rendered back as markup around its evaluated content.
//!
//! Only the recursion ceiling aborts an evaluation. Any other failing tag is
//! logged and contributes nothing.

mod context;
mod knowledge;
mod learn;
mod redispatch;
mod state;
mod text;

use std::sync::Arc;

use parley_pattern::{Category, Match, Segment, Stars};
use tracing::{debug, error};

/// Stack headroom below which evaluation moves onto a fresh segment.
const STACK_RED_ZONE: usize = 256 * 1024;
/// Size of each stack segment evaluation grows into.
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

use crate::markup::{self, Element, Node};
use crate::{
    Bot, EvalError, Learned, PROGRAM_NAME_VERSION, Predicates, Session, Substitutions,
    TEMPLATE_FAILED, Tag,
};

/// What a template is evaluated against: the rule that matched, the request
/// it matched, its wildcard bindings and the template's local variables.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    category: Option<Arc<Category>>,
    /// The input the rule matched.
    pub input: String,
    /// The that the rule matched.
    pub that: String,
    /// The topic the rule matched.
    pub topic: String,
    /// Wildcard bindings read by `<star>`, `<thatstar>` and `<topicstar>`.
    pub stars: Stars,
    /// Template-local variables written by `<set var>`.
    pub vars: Predicates,
    /// Redispatch nesting; 0 for a top-level response.
    pub depth: usize,
}

impl Frame {
    /// A frame for the template of a matched rule.
    pub fn matched(found: Match, input: &str, that: &str, topic: &str, depth: usize) -> Self {
        Frame {
            category: Some(found.category),
            input: input.to_owned(),
            that: that.to_owned(),
            topic: topic.to_owned(),
            stars: found.stars,
            vars: Predicates::default(),
            depth,
        }
    }

    /// A frame with no matched rule, for evaluating free-standing templates.
    pub fn detached(input: &str, that: &str, topic: &str) -> Self {
        Frame {
            input: input.to_owned(),
            that: that.to_owned(),
            topic: topic.to_owned(),
            ..Frame::default()
        }
    }

    /// Replaces the wildcard bindings.
    pub fn with_stars(mut self, stars: Stars) -> Self {
        self.stars = stars;
        self
    }

    /// The rule being evaluated, absent for detached frames.
    pub fn category(&self) -> Option<&Arc<Category>> {
        self.category.as_ref()
    }

    fn star(&self, segment: Segment, index: usize) -> &str {
        self.stars.get(segment, index).unwrap_or_default()
    }
}

/// Evaluates templates for one top-level response of a session.
///
/// The redispatch counter lives here, so it spans every `<srai>` reached
/// from the response this interpreter was created for.
pub struct Interpreter<'s> {
    bot: Arc<Bot>,
    session: &'s mut Session,
    srai_count: usize,
}

impl<'s> Interpreter<'s> {
    /// An interpreter for one top-level request.
    pub fn new(session: &'s mut Session) -> Self {
        Interpreter {
            bot: Arc::clone(session.bot()),
            session,
            srai_count: 0,
        }
    }

    /// The bot the session talks to.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// The session being answered.
    pub fn session(&mut self) -> &mut Session {
        &mut *self.session
    }

    /// Redispatches so far.
    pub fn srai_count(&self) -> usize {
        self.srai_count
    }

    /// Matches the input in context and evaluates the selected template, or
    /// answers with the default response when nothing matches.
    pub fn respond(&mut self, input: &str, that: &str, topic: &str) -> Result<String, EvalError> {
        self.dispatch(input, that, topic, 0)
    }

    fn dispatch(
        &mut self,
        input: &str,
        that: &str,
        topic: &str,
        depth: usize,
    ) -> Result<String, EvalError> {
        let Some(found) = self.bot.match_input(input, that, topic) else {
            debug!(input, that, topic, "No category matched");
            return Ok(self.bot.config().default_response.clone());
        };
        let category = Arc::clone(&found.category);
        let mut frame = Frame::matched(found, input, that, topic, depth);
        self.evaluate(category.template(), &mut frame)
    }

    /// Evaluates template markup. Markup that does not parse evaluates to
    /// `Template failed.`.
    pub fn evaluate(&mut self, template: &str, frame: &mut Frame) -> Result<String, EvalError> {
        let root = match markup::parse(&format!("<template>{template}</template>")) {
            Ok(root) => root,
            Err(error) => {
                error!(%error, template, "Template failed to parse");
                return Ok(TEMPLATE_FAILED.to_owned());
            }
        };
        self.eval_element(&root, frame)
    }

    /// Text evaluates to itself; elements are dispatched by name.
    pub fn eval_node(&mut self, node: &Node, frame: &mut Frame) -> Result<String, EvalError> {
        match node {
            Node::Text(text) => Ok(text.clone()),
            Node::Element(element) => self.eval_element(element, frame),
        }
    }

    /// Evaluates one element: a built-in tag, then an extension, then generic
    /// pass-through. Tag failures are contained here.
    pub fn eval_element(
        &mut self,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            self.eval_element_in_place(element, frame)
        })
    }

    fn eval_element_in_place(
        &mut self,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        let result = match element.name.parse::<Tag>() {
            Ok(tag) => self.eval_tag(tag, element, frame),
            Err(()) => {
                let handler = self.bot.extensions().get(&element.name).cloned();
                match handler {
                    Some(handler) => handler.evaluate(element, self, frame),
                    None => self.generic(element, frame),
                }
            }
        };

        match result {
            Err(EvalError::Tag { tag, reason }) => {
                error!(tag, reason, "Tag evaluation failed");
                Ok(String::new())
            }
            result => result,
        }
    }

    /// Evaluates every child of an element and concatenates the results.
    pub fn eval_content(
        &mut self,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        self.eval_content_except(element, frame, &[])
    }

    /// Like [`Interpreter::eval_content`], skipping child elements with any
    /// of the given names.
    pub fn eval_content_except(
        &mut self,
        element: &Element,
        frame: &mut Frame,
        skip: &[&str],
    ) -> Result<String, EvalError> {
        let mut output = String::new();
        for child in &element.children {
            if let Node::Element(inner) = child {
                if skip.contains(&inner.name.as_str()) {
                    continue;
                }
            }
            output.push_str(&self.eval_node(child, frame)?);
        }
        Ok(output)
    }

    /// Reads a tag parameter given either as an attribute or as a child
    /// element of the same name. A child is evaluated.
    pub fn attribute_or_child(
        &mut self,
        element: &Element,
        name: &str,
        frame: &mut Frame,
    ) -> Result<Option<String>, EvalError> {
        if let Some(value) = element.attribute(name) {
            return Ok(Some(value.to_owned()));
        }
        match element.child(name) {
            Some(child) => self.eval_content(child, frame).map(Some),
            None => Ok(None),
        }
    }

    fn eval_tag(
        &mut self,
        tag: Tag,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        match tag {
            Tag::Template => self.eval_content(element, frame),
            Tag::Random => self.random(element, frame),
            Tag::Condition => self.condition(element, frame),
            Tag::Srai => self.srai(element, frame),
            Tag::Sr => self.sr(frame),
            Tag::Set => self.set(element, frame),
            Tag::Get => self.get(element, frame),
            Tag::Map => self.map(element, frame),
            Tag::Bot => self.bot_property(element, frame),
            Tag::Id => Ok(self.session.id().to_owned()),
            Tag::Size => Ok(self.bot.size().to_string()),
            Tag::Vocabulary => Ok(self.bot.vocabulary().to_string()),
            Tag::Program => Ok(PROGRAM_NAME_VERSION.to_owned()),
            Tag::Think => {
                self.eval_content(element, frame)?;
                Ok(String::new())
            }
            Tag::Explode => Ok(text::explode(&self.eval_content(element, frame)?)),
            Tag::Uppercase => Ok(self.eval_content(element, frame)?.to_uppercase()),
            Tag::Lowercase => Ok(self.eval_content(element, frame)?.to_lowercase()),
            Tag::Formal => Ok(text::formal(&self.eval_content(element, frame)?)),
            Tag::Sentence => Ok(text::sentence(&self.eval_content(element, frame)?)),
            Tag::Normalize => self.substitute(Substitutions::Normal, element, frame),
            Tag::Denormalize => self.substitute(Substitutions::Denormal, element, frame),
            Tag::Person => self.substitute(Substitutions::Person, element, frame),
            Tag::Person2 => self.substitute(Substitutions::Person2, element, frame),
            Tag::Gender => self.substitute(Substitutions::Gender, element, frame),
            Tag::Star => self.star(tag, Segment::Input, element, frame),
            Tag::ThatStar => self.star(tag, Segment::That, element, frame),
            Tag::TopicStar => self.star(tag, Segment::Topic, element, frame),
            Tag::That => self.that(element, frame),
            Tag::Input => self.history(tag, element, frame),
            Tag::Request => self.history(tag, element, frame),
            Tag::Response => self.history(tag, element, frame),
            Tag::Learn => self.learn(element, frame, Learned::Session),
            Tag::Learnf => self.learn(element, frame, Learned::Persistent),
            Tag::ResetLearn => self.reset_learned(Learned::Session),
            Tag::ResetLearnf => self.reset_learned(Learned::Persistent),
            Tag::AddTriple => self.add_triple(element, frame),
            Tag::DeleteTriple => self.delete_triple(element, frame),
            Tag::Select => self.select(element, frame),
            Tag::Uniq => self.uniq(element, frame),
            Tag::Subject => self.triple_field(tag, element, frame),
            Tag::Predicate => self.triple_field(tag, element, frame),
            Tag::Object => self.triple_field(tag, element, frame),
            Tag::First => Ok(text::first_word(&self.eval_content(element, frame)?)),
            Tag::Rest => {
                let content = self.eval_content(element, frame)?;
                Ok(text::rest_words(&self.bot.preprocessor().normalize(&content)))
            }
        }
    }

    /// Renders an unknown element back as markup around its evaluated
    /// content.
    fn generic(&mut self, element: &Element, frame: &mut Frame) -> Result<String, EvalError> {
        let content = self.eval_content(element, frame)?;
        Ok(element.wrap(&content))
    }
}
