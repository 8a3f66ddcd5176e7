//! # Parley triples
//!
//! A small fact base of `(subject, predicate, object)` triples, indexed three
//! ways, with a conjunctive query engine on top.
//!
//! Queries are lists of [`Clause`]s evaluated left to right as a nested-loop
//! join over [`Tuple`]s. A negated clause keeps a tuple only when nothing
//! matches it (negation as failure). Tuples handed out to templates are
//! parked in a [`TupleArena`] owned by the caller.

#![warn(missing_docs)]

mod arena;
mod clause;
mod query;
mod store;
mod tuple;

pub use arena::*;
pub use clause::*;
pub use store::*;
pub use tuple::*;
