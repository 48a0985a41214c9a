use thiserror::Error;
use crate::core::{ExecutionError, Row, Value};

/// Failure reported by the underlying driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DriverError {
    pub message: String,
    /// Driver-specific diagnostics (native error code, server message, ...).
    pub debug: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>, debug: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            debug: debug.into(),
        }
    }

    /// Attaches the statement that failed.
    #[must_use]
    pub fn into_execution(self, sql: &str, params: &[Value]) -> ExecutionError {
        tracing::warn!(error = %self.message, sql, "statement failed");
        ExecutionError {
            message: self.message,
            debug: self.debug,
            sql: sql.to_string(),
            params: params.to_vec(),
        }
    }
}

/// Result of a statement that doesn't return rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOutcome {
    pub affected_rows: u64,
    /// `LAST_INSERT_ID()` after the statement, 0 when nothing was generated.
    pub last_insert_id: u64,
}

/// A database handle the executor runs statements through.
///
/// Implementations wrap a real driver; they receive SQL with `?` placeholders and the
/// parameters in placeholder order. Timeouts and reconnects are their business.
pub trait Connection: Send + Sync {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DriverError>;

    fn execute(&self, sql: &str, params: &[Value]) -> Result<WriteOutcome, DriverError>;
}
