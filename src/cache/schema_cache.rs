use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use crate::connection::Connection;
use crate::core::{Error, FieldSchema, KeyRole, PrimaryKey, Result, Row, TableSchema, Value};
use crate::query::quote_identifier;
use super::column_type::parse_column_type;

/// Column metadata per table, fetched once with `SHOW COLUMNS` and kept for the lifetime
/// of the cache. Schema changes made after the first lookup are not picked up.
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: RwLock<HashMap<String, Arc<TableSchema>>>,
}

impl SchemaCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table's schema, querying `connection` only on the first request.
    pub fn schema(&self, connection: &dyn Connection, table: &str) -> Result<Arc<TableSchema>> {
        let table = table.replace('`', "");
        if let Some(schema) = self.cached(&table) {
            return Ok(schema);
        }

        let sql = show_columns_sql(&table);
        let rows = connection
            .query(&sql, &[])
            .map_err(|e| e.into_execution(&sql, &[]))?;
        let schema = Arc::new(parse_show_columns(&table, &rows)?);
        tracing::debug!(table = %table, columns = schema.fields.len(), "schema cached");

        // Two threads may race to populate the same table; the first insert wins.
        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(schemas.entry(table).or_insert(schema)))
    }

    pub fn primary_key(&self, connection: &dyn Connection, table: &str) -> Result<PrimaryKey> {
        Ok(self.schema(connection, table)?.primary_key())
    }

    /// The schema if it has already been fetched.
    pub fn cached(&self, table: &str) -> Option<Arc<TableSchema>> {
        let schemas = self.schemas.read().unwrap_or_else(PoisonError::into_inner);
        schemas.get(table).cloned()
    }

    /// Seeds the cache, replacing anything stored for the same table.
    pub fn insert(&self, schema: TableSchema) {
        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        schemas.insert(schema.table.clone(), Arc::new(schema));
    }

    pub fn len(&self) -> usize {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[must_use]
pub fn show_columns_sql(table: &str) -> String {
    format!("SHOW COLUMNS FROM {};", quote_identifier(&table.replace('`', "")))
}

/// Builds a schema from `SHOW COLUMNS` rows (`Field`, `Type`, `Null`, `Key`, `Default`, `Extra`).
pub fn parse_show_columns(table: &str, rows: &[Row]) -> Result<TableSchema> {
    let fields = rows
        .iter()
        .map(|row| parse_field(table, row))
        .collect::<Result<Vec<_>>>()?;
    Ok(TableSchema::new(table.to_string(), fields))
}

fn parse_field(table: &str, row: &Row) -> Result<FieldSchema> {
    let name = required_text(table, row, "Field")?;
    let column_type = parse_column_type(&required_text(table, row, "Type")?);

    let extra = optional_text(row, "Extra").unwrap_or_default();
    let auto_increment = extra.eq_ignore_ascii_case("auto_increment");

    Ok(FieldSchema {
        name,
        sql_type: column_type.sql_type,
        length: column_type.length,
        values: column_type.values,
        nullable: optional_text(row, "Null").is_some_and(|n| n.eq_ignore_ascii_case("yes")),
        default: optional_text(row, "Default"),
        extra,
        auto_increment,
        key: optional_text(row, "Key").map_or(KeyRole::None, |k| KeyRole::from_show_columns(&k)),
    })
}

fn required_text(table: &str, row: &Row, column: &str) -> Result<String> {
    optional_text(row, column).ok_or_else(|| Error::Schema {
        table: table.to_string(),
        reason: format!("missing '{column}' column"),
    })
}

fn optional_text(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::Null => None,
        Value::Text(s) => Some(s.clone()),
        Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
        other => Some(other.to_string()),
    }
}
