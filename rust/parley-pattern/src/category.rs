use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::path::input_that_topic;

/// One authored rule: a pattern, that and topic triple pointing at an
/// unevaluated template.
///
/// Patterns are stored whitespace-collapsed and uppercased. The activation
/// count and sample matches are diagnostics updated through `&self`, so a
/// rule can be shared between concurrent matches.
#[derive(Debug)]
pub struct Category {
    pattern: String,
    that: String,
    topic: String,
    template: String,
    filename: String,
    sequence: usize,
    activations: AtomicUsize,
    samples: Mutex<BTreeSet<String>>,
}

impl Category {
    /// A rule with canonical (uppercased, space-collapsed) pattern, that and topic.
    pub fn new(pattern: &str, that: &str, topic: &str, template: &str) -> Self {
        Category {
            pattern: canonical(pattern),
            that: canonical(that),
            topic: canonical(topic),
            template: template.to_owned(),
            filename: String::new(),
            sequence: 0,
            activations: AtomicUsize::new(0),
            samples: Mutex::new(BTreeSet::new()),
        }
    }

    /// Tags the rule with where it came from.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Records the position of the rule within its source.
    pub fn with_sequence(mut self, sequence: usize) -> Self {
        self.sequence = sequence;
        self
    }

    /// The canonical input pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The canonical that pattern.
    pub fn that(&self) -> &str {
        &self.that
    }

    /// The canonical topic pattern.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The unevaluated template markup.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Where the rule came from: a file name, `learn` or `learnf`.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Position of the rule within its source.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// The `pattern <THAT> that <TOPIC> topic` form this rule is filed under.
    pub fn input_that_topic(&self) -> String {
        input_that_topic(&self.pattern, &self.that, &self.topic)
    }

    /// Number of times the matcher has selected this rule.
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::Relaxed)
    }

    /// Example inputs that selected this rule, in sorted order.
    pub fn sample_matches(&self) -> Vec<String> {
        self.samples.lock().iter().cloned().collect()
    }

    pub(crate) fn record_activation(&self, sample: String, limit: usize) {
        self.activations.fetch_add(1, Ordering::Relaxed);
        let mut samples = self.samples.lock();
        if samples.len() < limit || samples.contains(&sample) {
            samples.insert(sample);
        }
    }
}

pub(crate) fn canonical(pattern: &str) -> String {
    let words = pattern.split_whitespace().collect::<Vec<_>>();
    if words.is_empty() {
        "*".to_owned()
    } else {
        words.join(" ").to_uppercase()
    }
}
