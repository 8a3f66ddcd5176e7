//! # Parley pattern graph
//!
//! Rules ("categories") are filed in a word trie under the path
//! `pattern <THAT> that <TOPIC> topic`. Matching walks that trie depth-first,
//! trying edges at every node in a fixed priority order:
//!
//! ```text
//! end of path → height prune → $WORD → # → _ → WORD → <set> → shortcut → ^ → *
//! ```
//!
//! Wildcards bind the words they consume into [`Stars`], per segment. A
//! failed branch leaves no bindings behind: spans are recorded only while a
//! successful search unwinds.
//!
//! Word-sets and bot properties come from the host through the [`WordSets`]
//! and [`Properties`] traits.

#![warn(missing_docs)]

mod category;
mod config;
mod graph;
mod lookup;
mod node;
mod path;
mod stars;

pub use category::*;
pub use config::*;
pub use graph::*;
pub use lookup::*;
pub use path::*;
pub use stars::*;
