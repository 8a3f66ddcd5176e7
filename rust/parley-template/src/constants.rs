//! Fixed strings the engine answers with when a lookup or evaluation has
//! nothing better to say.

pub use parley_pattern::{NULL_INPUT, UNKNOWN};

/// Default for an empty list operation (`<first>`, `<rest>`, `<select>`).
pub const NIL: &str = "NIL";
/// Output of a template whose markup does not parse.
pub const TEMPLATE_FAILED: &str = "Template failed.";
/// Output when redispatch exceeds the recursion limits.
pub const TOO_MUCH_RECURSION: &str = "Too much recursion in AIML";
/// Output when a looping condition exceeds the loop limit.
pub const TOO_MUCH_LOOPING: &str = "Too much looping in AIML";
/// Input substituted when the same input repeats too many times in a row.
pub const REPETITION_DETECTED: &str = "REPETITIONDETECTED";
/// Marker a condition branch emits to request another iteration.
pub const LOOP_MARKER: &str = "<loop/>";

/// Answer of `<program/>`.
pub const PROGRAM_NAME_VERSION: &str = concat!("Parley ", env!("CARGO_PKG_VERSION"));
/// Answer of `<deletetriple>` when there was nothing to delete.
pub const UNDEFINED_TRIPLE: &str = "undefined";
