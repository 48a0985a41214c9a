// TinyDb - fluent SQL statement builder with result and schema caching
// Modular architecture: builder, caches, codec and executor are independent layers

// Clippy configuration - allow non-critical warnings
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::wildcard_enum_match_arm)]
#![allow(clippy::module_name_repetitions)]

// Core types (values, column metadata, rows, errors)
pub mod core;

// Statement builder (SELECT/INSERT/UPDATE/DELETE, SQL rendering, parameters)
pub mod query;

// Result cache and schema cache
pub mod cache;

// Host <-> column value conversion
pub mod codec;

// Database handle abstraction
pub mod connection;

// Statement execution (read/write routing, result shaping, DDL)
pub mod executor;

// Runtime options (file + environment)
pub mod config;

// Re-export commonly used types for convenience
pub use crate::core::{
    BuildError, CodecError, Error, ExecutionError, FieldSchema, KeyRole, Length, PrimaryKey, Result, Row,
    RowSet, SqlType, TableSchema, Value,
};
pub use crate::query::{Query, StatementKind};
pub use crate::cache::{ResultCache, SchemaCache};
pub use crate::connection::{Connection, DriverError, WriteOutcome};
pub use crate::executor::{ColumnDefinition, ExecOptions, Executor, Output, TableDefinition};
pub use crate::config::Settings;
