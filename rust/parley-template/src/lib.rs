//! # Parley templates
//!
//! Everything above the pattern graph: the template interpreter, the
//! [`Bot`] that owns the rules, and the [`Session`] that carries one
//! conversation.
//!
//! ```text
//! Session::multisentence_respond
//!   └─ per sentence: Session::respond
//!        └─ Bot::match_input ─► Interpreter::evaluate ─► reply
//!                                  └─ <srai> ─► Bot::match_input ─► …
//! ```
//!
//! A bot is configured once through its builder methods and then shared as
//! an `Arc<Bot>`; rules learned at runtime go into its brain behind a
//! read-write lock. Sessions are cheap and own their histories, predicates
//! and triple store.

#![warn(missing_docs)]

mod bot;
mod config;
mod constants;
mod error;
mod extension;
mod history;
mod interpreter;
mod maps;
/// Template markup as an element tree.
pub mod markup;
mod predicates;
mod properties;
mod session;
mod sets;
mod substitution;
mod tag;

pub use bot::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use extension::*;
pub use history::*;
pub use interpreter::*;
pub use maps::*;
pub use markup::{Element, Node};
pub use predicates::*;
pub use properties::*;
pub use session::*;
pub use sets::*;
pub use substitution::*;
pub use tag::*;
