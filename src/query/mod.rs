//! Read-only structural queries over a built [`ConfigTree`](crate::ConfigTree).
//!
//! Every query takes its patterns as [`LineMatcher`]s and returns lines
//! deduplicated and sorted by line index. A query that matches nothing
//! returns an empty list.

pub mod engine;
pub mod errors;
pub mod matcher;

pub use crate::cache::compile;
pub use engine::{unique, QueryEngine};
pub use errors::QueryError;
pub use matcher::{LineMatcher, Literal, Predicate};
