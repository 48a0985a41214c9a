// Scripted in-memory connection shared by the integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use tinydb::{Connection, DriverError, Row, Value, WriteOutcome};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Answers queries from a FIFO script and records every statement it receives.
#[derive(Default)]
pub struct ScriptedConnection {
    responses: Mutex<VecDeque<Result<Vec<Row>, DriverError>>>,
    outcomes: Mutex<VecDeque<Result<WriteOutcome, DriverError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, rows: Vec<Row>) {
        self.responses.lock().unwrap().push_back(Ok(rows));
    }

    pub fn fail_query(&self, message: &str, debug: &str) {
        self.responses.lock().unwrap().push_back(Err(DriverError::new(message, debug)));
    }

    pub fn insert_id(&self, id: u64) {
        self.outcomes.lock().unwrap().push_back(Ok(WriteOutcome { affected_rows: 1, last_insert_id: id }));
    }

    pub fn fail_execute(&self, message: &str, debug: &str) {
        self.outcomes.lock().unwrap().push_back(Err(DriverError::new(message, debug)));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sql(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.sql).collect()
    }

    fn record(&self, sql: &str, params: &[Value]) {
        self.calls.lock().unwrap().push(Call { sql: sql.to_string(), params: params.to_vec() });
    }
}

impl Connection for ScriptedConnection {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DriverError> {
        self.record(sql, params);
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<WriteOutcome, DriverError> {
        self.record(sql, params);
        self.outcomes.lock().unwrap().pop_front().unwrap_or_else(|| Ok(WriteOutcome::default()))
    }
}

pub fn row<const N: usize>(pairs: [(&str, Value); N]) -> Row {
    Row::from_pairs(pairs)
}

/// One `SHOW COLUMNS` row.
pub fn show_column(field: &str, type_name: &str, key: &str, extra: &str) -> Row {
    Row::from_pairs([
        ("Field", Value::from(field)),
        ("Type", Value::from(type_name)),
        ("Null", Value::from("NO")),
        ("Key", Value::from(key)),
        ("Default", Value::Null),
        ("Extra", Value::from(extra)),
    ])
}
