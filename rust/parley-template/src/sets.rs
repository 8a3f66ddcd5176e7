use std::collections::{HashMap, HashSet};

use parley_pattern::WordSets;

/// Name of the computed set of natural numbers.
pub const NUMBER_SET: &str = "number";

#[derive(Debug, Clone)]
enum WordSet {
    Listed {
        members: HashSet<String>,
        longest: usize,
    },
    Number,
}

/// In-memory word-sets, plus the computed `number` set.
#[derive(Debug, Clone)]
pub struct SetRegistry {
    sets: HashMap<String, WordSet>,
}

impl Default for SetRegistry {
    fn default() -> Self {
        SetRegistry {
            sets: HashMap::from([(NUMBER_SET.to_owned(), WordSet::Number)]),
        }
    }
}

impl SetRegistry {
    /// Registers (or replaces) a listed set. Members may be multi-word
    /// phrases; they are stored uppercased with whitespace collapsed.
    pub fn insert<I, S>(&mut self, name: &str, members: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members = members
            .into_iter()
            .map(|member| {
                member
                    .as_ref()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_uppercase()
            })
            .filter(|member| !member.is_empty())
            .collect::<HashSet<_>>();
        let longest = members
            .iter()
            .map(|member| member.split(' ').count())
            .max()
            .unwrap_or(1);
        self.sets
            .insert(name.to_lowercase(), WordSet::Listed { members, longest });
    }

    /// Words that appear in any listed set member.
    pub fn words(&self) -> HashSet<String> {
        self.sets
            .values()
            .filter_map(|set| match set {
                WordSet::Listed { members, .. } => Some(members),
                WordSet::Number => None,
            })
            .flatten()
            .flat_map(|member| member.split(' ').map(str::to_owned))
            .collect()
    }

    /// Number of registered sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether no set is registered.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl WordSets for SetRegistry {
    fn contains(&self, set: &str, phrase: &str) -> bool {
        match self.sets.get(set) {
            Some(WordSet::Listed { members, .. }) => members.contains(phrase),
            Some(WordSet::Number) => !phrase.is_empty() && phrase.chars().all(|c| c.is_ascii_digit()),
            None => false,
        }
    }

    fn max_phrase_length(&self, set: &str) -> usize {
        match self.sets.get(set) {
            Some(WordSet::Listed { longest, .. }) => *longest,
            Some(WordSet::Number) => 1,
            None => 0,
        }
    }

    fn is_defined(&self, set: &str) -> bool {
        self.sets.contains_key(set)
    }
}
