//! Word paths: the tokenized `input <THAT> that <TOPIC> topic` form that both
//! insertion and matching walk through the trie.

use std::fmt::Display;

/// Boundary token between the input and "that" segments.
pub const THAT: &str = "<THAT>";
/// Boundary token between the "that" and topic segments.
pub const TOPIC: &str = "<TOPIC>";
/// Stand-in for an empty input sentence.
pub const NULL_INPUT: &str = "NORESP";
/// Stand-in for an empty "that" or topic, and the general lookup default.
pub const UNKNOWN: &str = "unknown";

/// Returns true when `word` is one of the reserved segment boundaries.
pub fn is_marker(word: &str) -> bool {
    word == THAT || word == TOPIC
}

/// Joins words back into a single space-separated sentence.
pub fn sentence(words: &[String]) -> String {
    words.join(" ")
}

/// The segment of a path a word belongs to. Star bindings are recorded per
/// segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The words of the input sentence.
    Input,
    /// The words after `<THAT>`.
    That,
    /// The words after `<TOPIC>`.
    Topic,
}

/// An immutable sequence of word tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    words: Vec<String>,
}

impl Path {
    /// Splits a sentence on whitespace. Runs of whitespace never produce
    /// empty tokens.
    pub fn from_sentence(sentence: &str) -> Self {
        Path {
            words: sentence.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// Builds the three-segment path used for matching. Empty input becomes
    /// [`NULL_INPUT`]; an empty that or topic becomes [`UNKNOWN`].
    pub fn from_context(input: &str, that: &str, topic: &str) -> Self {
        Path::from_sentence(&input_that_topic(
            or_default(input, NULL_INPUT),
            or_default(that, UNKNOWN),
            or_default(topic, UNKNOWN),
        ))
    }

    /// The words of the path, markers included.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Number of words, markers included.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the path has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", sentence(&self.words))
    }
}

/// Formats the canonical `input <THAT> that <TOPIC> topic` string.
pub fn input_that_topic(input: &str, that: &str, topic: &str) -> String {
    format!(
        "{} {THAT} {} {TOPIC} {}",
        input.trim(),
        that.trim(),
        topic.trim()
    )
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}
