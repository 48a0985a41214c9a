//! Executor module - runs built statements against read/write connections
//!
//! Structure:
//! - dispatcher: read/write routing, result cache, result shaping
//! - ddl: CREATE/DROP TABLE, SHOW TABLES, schema lookups

pub mod dispatcher;
pub mod ddl;

pub use dispatcher::Executor;
pub use ddl::{ColumnDefinition, TableDefinition};

use crate::core::{Row, RowSet, Value};

/// Per-call execution switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    /// Collapse single-value results to a scalar and `LIMIT 1` results to a row.
    pub magic: bool,
    /// Look up and store select results in the result cache.
    pub use_cache: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self { magic: true, use_cache: true }
    }
}

/// What a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Scalar(Value),
    Row(Row),
    Rows(RowSet),
    /// Generated id of an insert.
    InsertId(u64),
    /// Update/delete.
    Done,
}

impl Output {
    #[must_use]
    pub fn into_scalar(self) -> Option<Value> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_row(self) -> Option<Row> {
        match self {
            Self::Row(row) => Some(row),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_rows(self) -> Option<RowSet> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    #[must_use]
    pub const fn insert_id(&self) -> Option<u64> {
        match self {
            Self::InsertId(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}
