use serde::{Deserialize, Serialize};
use super::data_type::SqlType;

/// Length metadata carried inside a column type (`varchar(255)`, `decimal(10,2)`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Length {
    Size(u32),
    Precision { precision: u32, scale: u32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum KeyRole {
    #[default]
    None,
    Primary,
    Unique,
    Multiple,
}

impl KeyRole {
    /// Maps the `Key` column of `SHOW COLUMNS` (`PRI`, `UNI`, `MUL`, empty).
    #[must_use]
    pub fn from_show_columns(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "pri" | "primary" => Self::Primary,
            "uni" | "unique" => Self::Unique,
            "mul" => Self::Multiple,
            _ => Self::None,
        }
    }

    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::Primary)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub sql_type: SqlType,
    pub length: Option<Length>,
    /// Members of an `enum(...)` or `set(...)` column.
    pub values: Option<Vec<String>>,
    pub nullable: bool,
    pub default: Option<String>,
    pub extra: String,
    pub auto_increment: bool,
    pub key: KeyRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryKey {
    None,
    Single(String),
    Composite(Vec<String>),
}

impl PrimaryKey {
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::None => Vec::new(),
            Self::Single(name) => vec![name.as_str()],
            Self::Composite(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// Column metadata for one table, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSchema {
    pub table: String,
    pub fields: Vec<FieldSchema>,
}

impl TableSchema {
    #[must_use]
    pub const fn new(table: String, fields: Vec<FieldSchema>) -> Self {
        Self { table, fields }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[must_use]
    pub fn primary_key(&self) -> PrimaryKey {
        let mut keys: Vec<String> = self
            .fields
            .iter()
            .filter(|f| f.key.is_primary())
            .map(|f| f.name.clone())
            .collect();

        match keys.len() {
            0 => PrimaryKey::None,
            1 => PrimaryKey::Single(keys.remove(0)),
            _ => PrimaryKey::Composite(keys),
        }
    }

    fn check(&self, column: &str, predicate: impl Fn(&SqlType) -> bool) -> bool {
        self.field(column).is_some_and(|f| predicate(&f.sql_type))
    }

    // Unknown columns classify as false everywhere.
    #[must_use]
    pub fn is_integral(&self, column: &str) -> bool {
        self.check(column, SqlType::is_integral)
    }

    #[must_use]
    pub fn is_floating(&self, column: &str) -> bool {
        self.check(column, SqlType::is_floating)
    }

    #[must_use]
    pub fn is_numeric(&self, column: &str) -> bool {
        self.check(column, SqlType::is_numeric)
    }

    #[must_use]
    pub fn is_boolean(&self, column: &str) -> bool {
        self.check(column, SqlType::is_boolean)
    }

    #[must_use]
    pub fn is_stringy(&self, column: &str) -> bool {
        self.check(column, SqlType::is_stringy)
    }

    #[must_use]
    pub fn is_temporal(&self, column: &str) -> bool {
        self.check(column, SqlType::is_temporal)
    }

    #[must_use]
    pub fn is_set(&self, column: &str) -> bool {
        self.check(column, SqlType::is_set)
    }
}
