use std::fmt;
use thiserror::Error;
use super::value::Value;

/// Programmer errors caught while a statement is being assembled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Query wildcards must have a 1:1 relation with passed parameters in {clause} clause '{text}': expected {expected}, got {given}")]
    WildcardMismatch {
        clause: &'static str,
        text: String,
        expected: usize,
        given: usize,
    },
    #[error("Cannot generate a {kind} query without a table")]
    MissingTarget { kind: &'static str },
    #[error("Cannot generate a query without a statement kind")]
    MissingKind,
    #[error("Invalid table definition: {0}")]
    InvalidDefinition(String),
}

/// A driver-reported failure, wrapped together with the statement that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionError {
    pub message: String,
    pub debug: String,
    pub sql: String,
    pub params: Vec<Value>,
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Couldn't execute SQL. {} {} The SQL was: \n{}\n", self.message, self.debug, self.sql)?;
        if !self.params.is_empty() {
            let rendered: Vec<String> = self.params.iter().map(ToString::to_string).collect();
            write!(f, "Parameters for replacement were: \n[{}]", rendered.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ExecutionError {}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Column type '{type_name}' expects an integer epoch timestamp, got {value}")]
    NotAnEpoch { type_name: String, value: String },
    #[error("Cannot interpret {0} as an integer")]
    InvalidInteger(String),
    #[error("Cannot interpret {0} as a floating point number")]
    InvalidFloat(String),
    #[error("Cannot interpret '{0}' as a SQL timestamp")]
    InvalidTimestamp(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("Malformed column description for table '{table}': {reason}")]
    Schema { table: String, reason: String },
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_display_includes_sql_and_params() {
        let err = ExecutionError {
            message: "no such table".to_string(),
            debug: "[1146]".to_string(),
            sql: "SELECT * FROM `ghost`;".to_string(),
            params: vec![Value::Integer(7), Value::Text("x".to_string())],
        };
        let text = err.to_string();
        assert!(text.starts_with("Couldn't execute SQL. no such table [1146]"));
        assert!(text.contains("SELECT * FROM `ghost`;"));
        assert!(text.contains("[7, x]"));
    }

    #[test]
    fn test_execution_error_display_omits_empty_params() {
        let err = ExecutionError {
            message: "boom".to_string(),
            debug: String::new(),
            sql: "SHOW TABLES;".to_string(),
            params: vec![],
        };
        assert!(!err.to_string().contains("Parameters"));
    }

    #[test]
    fn test_build_error_converts_into_error() {
        let err: Error = BuildError::MissingTarget { kind: "select" }.into();
        assert!(matches!(err, Error::Build(BuildError::MissingTarget { kind: "select" })));
        assert_eq!(err.to_string(), "Cannot generate a select query without a table");
    }
}
