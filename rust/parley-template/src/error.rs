use thiserror::Error;

/// Reasons evaluation of a template can stop short.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Redispatch went too deep or happened too often. Propagates up to the
    /// top-level response.
    #[error("too much recursion (depth {depth}, {count} redispatches)")]
    RecursionLimit {
        /// Depth of the redispatch that hit the ceiling.
        depth: usize,
        /// Redispatches made in the request so far.
        count: usize,
    },

    /// A single tag could not be evaluated. The tag contributes nothing and
    /// evaluation continues.
    #[error("<{tag}> failed: {reason}")]
    Tag {
        /// Name of the failing element.
        tag: String,
        /// What went wrong.
        reason: String,
    },
}

impl EvalError {
    /// A failure local to one tag.
    pub fn tag(tag: impl Into<String>, reason: impl ToString) -> Self {
        EvalError::Tag {
            tag: tag.into(),
            reason: reason.to_string(),
        }
    }
}

/// Template markup that cannot be read into an element tree.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// The reader rejected the markup.
    #[error("malformed markup: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute is not well formed.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// An element opened but never closed.
    #[error("element <{0}> is never closed")]
    Unclosed(String),

    /// The markup is not a single element.
    #[error("markup must have exactly one root element")]
    Root,
}

/// Configuration that cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON for the expected shape.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A substitution rule whose pattern does not compile.
    #[error("invalid substitution pattern {pattern:?}: {source}")]
    Substitution {
        /// The literal text the rule should match.
        pattern: String,
        /// Why the pattern was rejected.
        #[source]
        source: regex::Error,
    },
}
