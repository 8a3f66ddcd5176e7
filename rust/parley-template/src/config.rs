use parley_pattern::GraphConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Ceilings that bound the work a single response may do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Deepest nesting of redispatched templates.
    pub max_recursion_depth: usize,
    /// Most redispatches (`<srai>`, `<sr>`) in one top-level response.
    pub max_recursion_count: usize,
    /// Most iterations of a looping `<condition>`.
    pub max_loops: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_recursion_depth: 765,
            max_recursion_count: 2048,
            max_loops: 100,
        }
    }
}

/// Everything tunable about a bot and its sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How the brain and learn graphs are built.
    pub graph: GraphConfig,
    /// Ceilings on redispatch and looping.
    pub limits: Limits,
    /// Capacity of each session history.
    pub max_history: usize,
    /// Identical consecutive inputs tolerated before the input is replaced
    /// with `REPETITIONDETECTED`.
    pub repetition_count: usize,
    /// Makes `<random>` always pick its first item.
    pub qa_test_mode: bool,
    /// Answer when no rule matches.
    pub default_response: String,
    /// Predicate names that `<set>` reads back as the name itself.
    pub pronouns: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            limits: Limits::default(),
            max_history: 32,
            repetition_count: 2,
            qa_test_mode: false,
            default_response: "I have no answer for that.".to_owned(),
            pronouns: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Reads a configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_reads_partial_json() -> anyhow::Result<()> {
        let config = EngineConfig::from_json(
            r#"{ "qa_test_mode": true, "limits": { "max_loops": 5 }, "graph": { "shortcuts": false } }"#,
        )?;
        assert!(config.qa_test_mode);
        assert_eq!(config.limits.max_loops, 5);
        assert_eq!(config.limits.max_recursion_depth, 765);
        assert!(!config.graph.shortcuts);
        assert_eq!(config.max_history, 32);
        Ok(())
    }

    #[test]
    fn it_rejects_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }
}
