// Fluent statement builder: clause storage, SQL rendering, bound parameters
pub mod builder;
pub mod clause;
mod render;

pub use builder::{Query, StatementKind, DEFAULT_JOIN};
pub use clause::{count_wildcards, quote_identifier, Clause, Join, WILDCARD};
