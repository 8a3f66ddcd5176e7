use std::collections::HashMap;

use crate::Tuple;

/// Named storage for tuples handed out by queries, so a later lookup can
/// refer to one by name.
///
/// Owned by whoever runs the queries and cleared between requests. Names are
/// never reused, so a stale name simply stops resolving.
#[derive(Debug, Default)]
pub struct TupleArena {
    tuples: HashMap<String, Tuple>,
    issued: u64,
}

impl TupleArena {
    /// Stores a tuple under a fresh name and returns the name.
    pub fn register(&mut self, tuple: Tuple) -> String {
        self.issued += 1;
        let name = format!("tuple{}", self.issued);
        self.tuples.insert(name.clone(), tuple);
        name
    }

    /// The tuple registered under a name.
    pub fn get(&self, name: &str) -> Option<&Tuple> {
        self.tuples.get(name)
    }

    /// The value a registered tuple binds to `variable`.
    pub fn value(&self, name: &str, variable: &str) -> Option<&str> {
        self.get(name)?.value(variable)
    }

    /// Drops every tuple. Names handed out earlier stay retired.
    pub fn clear(&mut self) {
        self.tuples.clear();
    }

    /// Number of tuples held.
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Whether no tuple is held.
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }
}
