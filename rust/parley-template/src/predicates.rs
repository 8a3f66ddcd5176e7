use std::collections::HashMap;

use crate::constants::UNKNOWN;

/// Named per-session values written by `<set name>` and read by
/// `<get name>` and `<condition name>`.
#[derive(Debug, Clone, Default)]
pub struct Predicates {
    values: HashMap<String, String>,
}

impl Predicates {
    /// The stored value, or `unknown`.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or(UNKNOWN)
    }

    /// Stores a value. An empty topic reads back as `unknown`.
    pub fn set(&mut self, name: &str, value: &str) {
        let value = if name == "topic" && value.is_empty() {
            UNKNOWN
        } else {
            value
        };
        self.values.insert(name.to_owned(), value.to_owned());
    }

    /// Whether a value was ever stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Every stored name and value, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
