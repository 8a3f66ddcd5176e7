use rand::Rng;
use tracing::{debug, warn};

use super::{Frame, Interpreter};
use crate::{Element, EvalError, LOOP_MARKER, TOO_MUCH_LOOPING, UNKNOWN};

const CONDITION_PARAMETERS: [&str; 3] = ["name", "var", "value"];

impl Interpreter<'_> {
    /// `<set name>` writes a predicate, `<set var>` a template variable.
    pub(super) fn set(&mut self, element: &Element, frame: &mut Frame) -> Result<String, EvalError> {
        let name = self.attribute_or_child(element, "name", frame)?;
        let var = self.attribute_or_child(element, "var", frame)?;
        let value = self
            .eval_content_except(element, frame, &["name", "var"])?
            .trim()
            .replace(['\r', '\n'], " ");

        if let Some(name) = &name {
            self.session.predicates_mut().set(name, &value);
            debug!(predicate = %name, value = %value, "Set predicate");
        }
        if let Some(var) = &var {
            frame.vars.set(var, &value);
            debug!(var = %var, value = %value, "Set variable");
        }

        match name {
            Some(name) if self.bot.config().pronouns.contains(&name) => Ok(name),
            _ => Ok(value),
        }
    }

    /// `<get name>`, `<get var>` or `<get var tuple>`.
    pub(super) fn get(&mut self, element: &Element, frame: &mut Frame) -> Result<String, EvalError> {
        if let Some(name) = self.attribute_or_child(element, "name", frame)? {
            return Ok(self.session.predicates().get(&name).trim().to_owned());
        }
        let Some(var) = self.attribute_or_child(element, "var", frame)? else {
            return Ok(UNKNOWN.to_owned());
        };
        match self.attribute_or_child(element, "tuple", frame)? {
            Some(tuple) => Ok(self
                .session
                .tuples()
                .value(tuple.trim(), &var)
                .unwrap_or(UNKNOWN)
                .to_owned()),
            None => Ok(frame.vars.get(&var).trim().to_owned()),
        }
    }

    /// `<random>`: one `<li>` at random, or always the first in QA test mode.
    pub(super) fn random(&mut self, element: &Element, frame: &mut Frame) -> Result<String, EvalError> {
        let items = element
            .elements()
            .filter(|child| child.name == "li")
            .collect::<Vec<_>>();
        if items.is_empty() {
            return Err(EvalError::tag("random", "no <li> to choose from"));
        }
        let index = if self.bot.config().qa_test_mode {
            0
        } else {
            rand::thread_rng().gen_range(0..items.len())
        };
        self.eval_content(items[index], frame)
    }

    /// `<condition>`, re-evaluated while the chosen branch asks to loop.
    pub(super) fn condition(
        &mut self,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        let max_loops = self.bot.config().limits.max_loops;
        let mut output = String::new();
        for _ in 0..max_loops {
            let pass = self.condition_once(element, frame)?;
            if !pass.contains(LOOP_MARKER) {
                output.push_str(&pass);
                return Ok(output);
            }
            output.push_str(&pass.replace(LOOP_MARKER, ""));
        }
        warn!(max_loops, "Loop limit reached");
        Ok(TOO_MUCH_LOOPING.to_owned())
    }

    fn condition_once(&mut self, element: &Element, frame: &mut Frame) -> Result<String, EvalError> {
        let name = self.attribute_or_child(element, "name", frame)?;
        let var = self.attribute_or_child(element, "var", frame)?;
        let branches = element
            .elements()
            .filter(|child| child.name == "li")
            .collect::<Vec<_>>();

        if branches.is_empty() {
            let Some(value) = self.attribute_or_child(element, "value", frame)? else {
                return Ok(String::new());
            };
            let holds = name
                .as_deref()
                .is_some_and(|name| same_value(self.session.predicates().get(name), &value))
                || var
                    .as_deref()
                    .is_some_and(|var| same_value(frame.vars.get(var), &value));
            return if holds {
                self.eval_content_except(element, frame, &CONDITION_PARAMETERS)
            } else {
                Ok(String::new())
            };
        }

        for branch in branches {
            let branch_name = match &name {
                Some(name) => Some(name.clone()),
                None => self.attribute_or_child(branch, "name", frame)?,
            };
            let branch_var = match &var {
                Some(var) => Some(var.clone()),
                None => self.attribute_or_child(branch, "var", frame)?,
            };
            let Some(value) = self.attribute_or_child(branch, "value", frame)? else {
                return self.eval_content_except(branch, frame, &CONDITION_PARAMETERS);
            };

            let predicates = self.session.predicates();
            let holds = branch_name.as_deref().is_some_and(|name| {
                same_value(predicates.get(name), &value)
                    || (value == "*" && predicates.contains(name))
            }) || branch_var.as_deref().is_some_and(|var| {
                same_value(frame.vars.get(var), &value) || (value == "*" && frame.vars.contains(var))
            });
            if holds {
                return self.eval_content_except(branch, frame, &CONDITION_PARAMETERS);
            }
        }
        Ok(String::new())
    }
}

fn same_value(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}
