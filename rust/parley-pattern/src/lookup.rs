//! Lookups the matcher borrows from its host: named word-sets and bot
//! properties. Implementations may be in memory, computed or remote; a
//! failing backend answers "not a member" or "absent".

use std::collections::HashMap;

/// Membership queries against named word-sets.
pub trait WordSets {
    /// Whether `phrase` (already uppercased) belongs to the set.
    fn contains(&self, set: &str, phrase: &str) -> bool;

    /// The longest phrase, in words, the set can contain.
    fn max_phrase_length(&self, set: &str) -> usize;

    /// Whether a set with this (lowercase) name is known.
    fn is_defined(&self, set: &str) -> bool;
}

/// Read access to bot properties such as `name` or `master`.
pub trait Properties {
    /// The value of a property, if it is set.
    fn property(&self, name: &str) -> Option<String>;
}

/// Answers no to everything. Useful for graphs without sets or properties.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSets;

impl WordSets for NoSets {
    fn contains(&self, _set: &str, _phrase: &str) -> bool {
        false
    }

    fn max_phrase_length(&self, _set: &str) -> usize {
        0
    }

    fn is_defined(&self, _set: &str) -> bool {
        false
    }
}

impl Properties for NoSets {
    fn property(&self, _name: &str) -> Option<String> {
        None
    }
}

impl Properties for HashMap<String, String> {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: WordSets + ?Sized> WordSets for &T {
    fn contains(&self, set: &str, phrase: &str) -> bool {
        (**self).contains(set, phrase)
    }

    fn max_phrase_length(&self, set: &str) -> usize {
        (**self).max_phrase_length(set)
    }

    fn is_defined(&self, set: &str) -> bool {
        (**self).is_defined(set)
    }
}
