use parley_pattern::Segment;
use tracing::{debug, warn};

use super::{Frame, Interpreter, STACK_RED_ZONE, STACK_SEGMENT};
use crate::{Element, EvalError};

impl Interpreter<'_> {
    /// `<srai>`: answers the evaluated content as if it were a new input.
    pub(super) fn srai(&mut self, element: &Element, frame: &mut Frame) -> Result<String, EvalError> {
        let request = self.eval_content(element, frame)?;
        self.redispatch(&request, frame)
    }

    /// `<sr/>`: shorthand for `<srai><star/></srai>`.
    pub(super) fn sr(&mut self, frame: &mut Frame) -> Result<String, EvalError> {
        let request = frame.star(Segment::Input, 1).to_owned();
        self.redispatch(&request, frame)
    }

    /// Matches `request` against the same `that` and the session's current
    /// topic, one level deeper.
    fn redispatch(&mut self, request: &str, frame: &Frame) -> Result<String, EvalError> {
        self.srai_count += 1;
        let limits = &self.bot.config().limits;
        if self.srai_count > limits.max_recursion_count || frame.depth > limits.max_recursion_depth {
            warn!(
                depth = frame.depth,
                count = self.srai_count,
                "Recursion limit reached"
            );
            return Err(EvalError::RecursionLimit {
                depth: frame.depth,
                count: self.srai_count,
            });
        }

        let input = self
            .bot
            .preprocessor()
            .normalize(&request.trim().replace(['\r', '\n'], " "));
        let topic = self.session.predicates().get("topic").to_owned();
        debug!(
            srai = %input,
            topic = %topic,
            depth = frame.depth,
            from = ?frame.category().map(|category| category.input_that_topic()),
            "Redispatching"
        );

        let response = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            self.dispatch(&input, &frame.that, &topic, frame.depth + 1)
        })?;
        Ok(response.trim().to_owned())
    }
}
