use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base column type, as reported by `SHOW COLUMNS` once the parenthesized metadata is
/// stripped off (`varchar(255)` -> `Varchar`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SqlType {
    // Truthy types
    Bit,
    Bool,
    // Integer types
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Serial,  // BIGINT UNSIGNED NOT NULL AUTO_INCREMENT UNIQUE
    Year,
    // Floating types
    Decimal,
    Float,
    Double,
    Real,
    // String types
    Char,
    Varchar,
    TinyText,
    Text,
    MediumText,
    LongText,
    // Date/Time types
    Date,
    DateTime,
    Timestamp,
    Time,
    // Binary types
    Binary,
    VarBinary,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    // Enumerations
    Enum,
    Set,
    /// Anything else; values of these columns pass through untouched.
    Other(String),
}

impl SqlType {
    /// Parses a bare type name. Never fails: unknown names become `Other`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "bit" => Self::Bit,
            "bool" | "boolean" => Self::Bool,
            "tinyint" => Self::TinyInt,
            "smallint" => Self::SmallInt,
            "mediumint" => Self::MediumInt,
            "int" | "integer" => Self::Int,
            "bigint" => Self::BigInt,
            "serial" => Self::Serial,
            "year" => Self::Year,
            "decimal" => Self::Decimal,
            "float" => Self::Float,
            "double" => Self::Double,
            "real" => Self::Real,
            "char" => Self::Char,
            "varchar" => Self::Varchar,
            "tinytext" => Self::TinyText,
            "text" => Self::Text,
            "mediumtext" => Self::MediumText,
            "longtext" => Self::LongText,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "timestamp" => Self::Timestamp,
            "time" => Self::Time,
            "binary" => Self::Binary,
            "varbinary" => Self::VarBinary,
            "tinyblob" => Self::TinyBlob,
            "blob" => Self::Blob,
            "mediumblob" => Self::MediumBlob,
            "longblob" => Self::LongBlob,
            "enum" => Self::Enum,
            "set" => Self::Set,
            _ => Self::Other(lower),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bit => "bit",
            Self::Bool => "bool",
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::MediumInt => "mediumint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Serial => "serial",
            Self::Year => "year",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Double => "double",
            Self::Real => "real",
            Self::Char => "char",
            Self::Varchar => "varchar",
            Self::TinyText => "tinytext",
            Self::Text => "text",
            Self::MediumText => "mediumtext",
            Self::LongText => "longtext",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Time => "time",
            Self::Binary => "binary",
            Self::VarBinary => "varbinary",
            Self::TinyBlob => "tinyblob",
            Self::Blob => "blob",
            Self::MediumBlob => "mediumblob",
            Self::LongBlob => "longblob",
            Self::Enum => "enum",
            Self::Set => "set",
            Self::Other(name) => name,
        }
    }

    #[must_use]
    pub const fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::TinyInt | Self::SmallInt | Self::MediumInt | Self::Int | Self::BigInt | Self::Serial | Self::Year
        )
    }

    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self, Self::Decimal | Self::Float | Self::Double | Self::Real)
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.is_integral() || self.is_floating()
    }

    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, Self::Bit | Self::Bool)
    }

    #[must_use]
    pub const fn is_stringy(&self) -> bool {
        matches!(
            self,
            Self::Char | Self::Varchar | Self::TinyText | Self::Text | Self::MediumText | Self::LongText
        )
    }

    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::Timestamp | Self::Time)
    }

    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(
            self,
            Self::Binary | Self::VarBinary | Self::TinyBlob | Self::Blob | Self::MediumBlob | Self::LongBlob
        )
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set)
    }
}

impl FromStr for SqlType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
