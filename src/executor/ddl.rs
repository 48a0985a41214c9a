//! DDL (Data Definition Language) and catalog operations
//!
//! CREATE TABLE, DROP TABLE, SHOW TABLES, SHOW COLUMNS

use std::sync::Arc;
use crate::codec;
use crate::core::{BuildError, PrimaryKey, Result, SqlType, TableSchema, Value};
use crate::query::quote_identifier;
use super::dispatcher::Executor;

/// One column of a `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    /// Full type as written in DDL, e.g. `varchar(255)`.
    pub type_name: String,
    pub nullable: bool,
    pub auto_increment: bool,
    pub default: Option<Value>,
    /// `primary`, `unique`, ... Columns sharing a key type are grouped into one KEY clause.
    pub key: Option<String>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: false,
            auto_increment: false,
            default: None,
            key: None,
        }
    }

    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    // `varchar(255)` -> `varchar`
    fn base_type(&self) -> &str {
        self.type_name.split('(').next().unwrap_or_default().trim()
    }

    fn render(&self) -> Result<String> {
        if self.type_name.trim().is_empty() {
            return Err(BuildError::InvalidDefinition(format!("column '{}' has no type", self.name)).into());
        }

        let mut line = format!("\t{} {}", quote_identifier(&self.name), self.type_name);
        line.push_str(if self.nullable { " NULL" } else { " NOT NULL" });
        if self.auto_increment {
            line.push_str(" AUTO_INCREMENT");
        }
        if let Some(default) = &self.default {
            let encoded = codec::encode(&SqlType::from_name(self.base_type()), default.clone())?;
            line.push_str(" DEFAULT ");
            line.push_str(&default_literal(&encoded));
        }
        Ok(line)
    }
}

fn default_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Boolean(b) => u8::from(*b).to_string(),
        Value::Integer(_) | Value::Real(_) | Value::Numeric(_) => value.to_string(),
        Value::Bytes(bytes) => format!("X'{}'", hex::encode(bytes)),
        other => {
            let escaped = other.to_string().replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        }
    }
}

/// A `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    /// Falls back to `Settings::default_engine`.
    pub engine: Option<String>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            engine: None,
        }
    }

    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn render(&self, default_engine: &str) -> Result<String> {
        if self.columns.is_empty() {
            return Err(BuildError::InvalidDefinition(format!("table '{}' has no columns", self.name)).into());
        }

        let mut lines = self
            .columns
            .iter()
            .map(ColumnDefinition::render)
            .collect::<Result<Vec<_>>>()?;

        // key type -> columns, in order of first appearance
        let mut keys: Vec<(String, Vec<&str>)> = Vec::new();
        for column in &self.columns {
            let Some(key) = column.key.as_deref().map(|k| k.trim().to_ascii_lowercase()) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            match keys.iter_mut().find(|(k, _)| *k == key) {
                Some((_, columns)) => columns.push(column.name.as_str()),
                None => keys.push((key, vec![column.name.as_str()])),
            }
        }
        for (key, columns) in keys {
            let quoted: Vec<String> = columns.into_iter().map(quote_identifier).collect();
            lines.push(format!("\t{} KEY ({})", key.to_ascii_uppercase(), quoted.join(", ")));
        }

        let engine = self.engine.as_deref().unwrap_or(default_engine);
        Ok(format!(
            "CREATE TABLE {} (\n{}\n) ENGINE={engine};",
            quote_identifier(&self.name),
            lines.join(",\n")
        ))
    }
}

impl Executor {
    /// Table names of the current database, via `SHOW TABLES` on the write connection.
    pub fn show_tables(&self) -> Result<Vec<String>> {
        let sql = "SHOW TABLES;";
        let rows = self
            .write_connection()
            .query(sql, &[])
            .map_err(|e| e.into_execution(sql, &[]))?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get_at(0))
            .map(|name| match name {
                Value::Text(s) => s.clone(),
                other => other.to_string(),
            })
            .collect())
    }

    pub fn table_exists(&self, name: &str) -> Result<bool> {
        Ok(self.show_tables()?.iter().any(|t| t == name))
    }

    pub fn create_table(&self, definition: &TableDefinition) -> Result<()> {
        let sql = definition.render(&self.settings().default_engine)?;
        tracing::debug!(table = %definition.name, "creating table");
        self.write_connection()
            .execute(&sql, &[])
            .map_err(|e| e.into_execution(&sql, &[]))?;
        Ok(())
    }

    /// Drops the table and every cached result for it.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let sql = format!("DROP TABLE {};", quote_identifier(name));
        let outcome = self.write_connection().execute(&sql, &[]);
        self.results().invalidate(name);
        outcome.map_err(|e| e.into_execution(&sql, &[]))?;
        Ok(())
    }

    /// Column metadata through the read connection, cached after the first call.
    pub fn table_schema(&self, name: &str) -> Result<Arc<TableSchema>> {
        self.schemas().schema(self.read_connection(), name)
    }

    pub fn primary_key(&self, name: &str) -> Result<PrimaryKey> {
        self.schemas().primary_key(self.read_connection(), name)
    }
}
