use serde::{Deserialize, Serialize};

/// Tuning knobs for a [`crate::Graph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Collapse a trailing `<THAT> * <TOPIC> *` into a shortcut leaf.
    pub shortcuts: bool,
    /// Upper bound on wildcard bindings per segment.
    pub max_stars: usize,
    /// How many distinct sample inputs each rule remembers.
    pub max_sample_matches: usize,
    /// Value bound to a zero-width `#` or `^` match.
    pub null_star: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            shortcuts: true,
            max_stars: 1000,
            max_sample_matches: 10,
            null_star: "nullstar".to_owned(),
        }
    }
}
