use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

/// The state of one query variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Declared but not yet bound.
    Unbound,
    /// Bound to a normalized value.
    Bound(String),
}

/// A variable assignment built up while answering a query.
///
/// Only the visible variables take part in answer identity: two tuples are
/// the same answer when they agree on every visible variable and neither has
/// one left unbound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tuple {
    bindings: BTreeMap<String, Binding>,
    visible: BTreeSet<String>,
}

impl Tuple {
    /// A tuple over `variables` with every one of them unbound.
    pub fn new<V, S>(variables: V, visible: S) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Tuple {
            bindings: variables
                .into_iter()
                .map(|variable| (variable.into(), Binding::Unbound))
                .collect(),
            visible: visible.into_iter().map(Into::into).collect(),
        }
    }

    /// The bound value of a variable, if any.
    pub fn value(&self, variable: &str) -> Option<&str> {
        match self.bindings.get(variable)? {
            Binding::Bound(value) => Some(value.as_str()),
            Binding::Unbound => None,
        }
    }

    /// Whether a variable has a value.
    pub fn is_bound(&self, variable: &str) -> bool {
        self.value(variable).is_some()
    }

    /// Binds a variable. The first binding wins; a later attempt to change
    /// it is logged and ignored.
    pub fn bind(&mut self, variable: &str, value: impl Into<String>) {
        let value = value.into();
        match self.bindings.get(variable) {
            Some(Binding::Bound(existing)) => {
                if *existing != value {
                    warn!(
                        variable,
                        existing = %existing,
                        ignored = %value,
                        "Variable already bound"
                    );
                }
            }
            _ => {
                self.bindings
                    .insert(variable.to_owned(), Binding::Bound(value));
            }
        }
    }

    /// Every variable and its binding, in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings
            .iter()
            .map(|(variable, binding)| (variable.as_str(), binding))
    }

    /// Variables that identify an answer.
    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().map(String::as_str)
    }

    /// The visible bindings, or `None` if any visible variable is unbound.
    pub fn answer(&self) -> Option<Vec<(&str, &str)>> {
        self.visible
            .iter()
            .map(|variable| Some((variable.as_str(), self.value(variable)?)))
            .collect()
    }

    /// Whether both tuples denote the same answer.
    pub fn same_answer(&self, other: &Tuple) -> bool {
        self.visible == other.visible
            && matches!((self.answer(), other.answer()), (Some(left), Some(right)) if left == right)
    }
}
