use serde::{Deserialize, Serialize};
use comfy_table::{Cell, Table as TextTable, presets::UTF8_FULL};
use std::fmt;
use std::ops::Index;
use super::column::TableSchema;
use super::error::CodecError;
use super::value::Value;
use crate::codec;

/// One fetched row: an ordered mapping from column name to value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

/// Anything a row can be indexed by: a column position or a column name.
pub trait RowIndex {
    fn position(&self, row: &Row) -> Option<usize>;
}

impl RowIndex for usize {
    fn position(&self, row: &Row) -> Option<usize> {
        (*self < row.values.len()).then_some(*self)
    }
}

impl RowIndex for &str {
    fn position(&self, row: &Row) -> Option<usize> {
        row.columns.iter().position(|c| c == self)
    }
}

impl RowIndex for String {
    fn position(&self, row: &Row) -> Option<usize> {
        self.as_str().position(row)
    }
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut row = Self::new();
        for (name, value) in pairs {
            row.push(name, value);
        }
        row
    }

    /// Appends a column, replacing the value if the name is already present.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.columns.iter().position(|c| *c == name) {
            Some(i) => self.values[i] = value,
            None => {
                self.columns.push(name);
                self.values.push(value);
            }
        }
    }

    pub fn get<I: RowIndex>(&self, index: I) -> Option<&Value> {
        index.position(self).map(|i| &self.values[i])
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    #[must_use]
    pub fn get_at(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    pub fn get_mut<I: RowIndex>(&mut self, index: I) -> Option<&mut Value> {
        index.position(self).map(move |i| &mut self.values[i])
    }

    #[must_use]
    pub fn column_name(&self, position: usize) -> Option<&str> {
        self.columns.get(position).map(String::as_str)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Decodes every column through the codec using the table's cached column types.
    /// Columns the schema doesn't know about are kept as they are.
    pub fn decode_with(&self, schema: &TableSchema) -> Result<Self, CodecError> {
        let mut decoded = Self::new();
        for (name, value) in self.iter() {
            let value = match schema.field(name) {
                Some(field) => codec::decode(&field.sql_type, value.clone())?,
                None => value.clone(),
            };
            decoded.push(name, value);
        }
        Ok(decoded)
    }

    /// Decodes one column through the codec.
    pub fn get_decoded(&self, name: &str, schema: &TableSchema) -> Result<Option<Value>, CodecError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        match schema.field(name) {
            Some(field) => codec::decode(&field.sql_type, value.clone()).map(Some),
            None => Ok(Some(value.clone())),
        }
    }
}

impl<I: RowIndex> Index<I> for Row {
    type Output = Value;

    fn index(&self, index: I) -> &Value {
        match index.position(self) {
            Some(i) => &self.values[i],
            None => panic!("no such column in row"),
        }
    }
}

/// Ordered rows returned by a select.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RowSet {
    rows: Vec<Row>,
}

impl RowSet {
    #[must_use]
    pub const fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// (number of rows, number of columns in the first row)
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Row::len))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// The first `n` rows.
    #[must_use]
    pub fn truncated(&self, n: usize) -> Self {
        Self::new(self.rows.iter().take(n).cloned().collect())
    }
}

impl From<Vec<Row>> for RowSet {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

impl Index<usize> for RowSet {
    type Output = Row;

    fn index(&self, index: usize) -> &Row {
        &self.rows[index]
    }
}

impl IntoIterator for RowSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for RowSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "(0 rows)");
        }

        let mut table = TextTable::new();
        table.load_preset(UTF8_FULL);
        if let Some(first) = self.rows.first() {
            table.set_header(first.columns().iter().map(Cell::new));
        }
        for row in &self.rows {
            table.add_row(row.values().iter().map(Cell::new));
        }
        write!(f, "{table}\n({} rows)", self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::column::{FieldSchema, KeyRole};
    use crate::core::data_type::SqlType;

    fn sample() -> Row {
        Row::from_pairs([("id", Value::Integer(1)), ("name", Value::Text("Alice".to_string()))])
    }

    #[test]
    fn test_row_access_by_position_and_name() {
        let row = sample();
        assert_eq!(row.get(0), Some(&Value::Integer(1)));
        assert_eq!(row.get("name"), Some(&Value::Text("Alice".to_string())));
        assert_eq!(row["id"], Value::Integer(1));
        assert_eq!(row.get(2), None);
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.column_name(1), Some("name"));
    }

    #[test]
    fn test_row_push_replaces_existing_column() {
        let mut row = sample();
        row.push("name", "Bob");
        assert_eq!(row.len(), 2);
        assert_eq!(row["name"], Value::Text("Bob".to_string()));
    }

    #[test]
    fn test_rowset_dimensions() {
        assert_eq!(RowSet::default().dimensions(), (0, 0));
        let set = RowSet::new(vec![sample(), sample(), sample()]);
        assert_eq!(set.dimensions(), (3, 2));
        assert_eq!(set.truncated(1).len(), 1);
    }

    #[test]
    fn test_rowset_display_renders_header_and_values() {
        let rendered = RowSet::new(vec![sample()]).to_string();
        assert!(rendered.contains("name"));
        assert!(rendered.contains("Alice"));
    }

    #[test]
    fn test_decode_with_schema() {
        let schema = TableSchema::new(
            "flags".to_string(),
            vec![
                FieldSchema {
                    name: "active".to_string(),
                    sql_type: SqlType::Bit,
                    length: None,
                    values: None,
                    nullable: false,
                    default: None,
                    extra: String::new(),
                    auto_increment: false,
                    key: KeyRole::None,
                },
                FieldSchema {
                    name: "tags".to_string(),
                    sql_type: SqlType::Set,
                    length: None,
                    values: Some(vec!["a".to_string(), "b".to_string()]),
                    nullable: true,
                    default: None,
                    extra: String::new(),
                    auto_increment: false,
                    key: KeyRole::None,
                },
            ],
        );
        let row = Row::from_pairs([
            ("active", Value::Integer(1)),
            ("tags", Value::Text("a,b".to_string())),
            ("extra", Value::Integer(9)),
        ]);

        let decoded = row.decode_with(&schema).unwrap();
        assert_eq!(decoded["active"], Value::Boolean(true));
        assert_eq!(decoded["tags"], Value::List(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(decoded["extra"], Value::Integer(9));
        assert_eq!(row.get_decoded("active", &schema).unwrap(), Some(Value::Boolean(true)));
        assert_eq!(row.get_decoded("nope", &schema).unwrap(), None);
    }
}
