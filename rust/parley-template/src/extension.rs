//! The hook for tags the interpreter does not know.
//!
//! A [`TagHandler`] is offered every element whose name is not a built-in
//! tag. It evaluates the element with full access to the interpreter, so it
//! can evaluate its own content, read stars and predicates, or redispatch.

use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::{Element, EvalError, Frame, Interpreter};

/// Evaluates elements of a tag the interpreter does not know.
pub trait TagHandler: Send + Sync {
    /// Produces the element's output. Handlers may evaluate content through
    /// `interpreter`; an [`EvalError::Tag`] is logged and yields nothing.
    fn evaluate(
        &self,
        element: &Element,
        interpreter: &mut Interpreter<'_>,
        frame: &mut Frame,
    ) -> Result<String, EvalError>;
}

/// Handlers by tag name, in registration order.
#[derive(Clone, Default)]
pub struct Extensions {
    handlers: IndexMap<String, Arc<dyn TagHandler>>,
}

impl Extensions {
    /// Registers a handler. Built-in tag names are never routed here.
    pub fn register(&mut self, tag: impl Into<String>, handler: impl TagHandler + 'static) {
        self.handlers.insert(tag.into(), Arc::new(handler));
    }

    /// The handler registered for a tag name.
    pub fn get(&self, tag: &str) -> Option<&Arc<dyn TagHandler>> {
        self.handlers.get(tag)
    }

    /// Registered tag names, in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tags()).finish()
    }
}
