// Module declarations
pub mod error;
pub mod value;
pub mod data_type;
pub mod column;
pub mod row;

// Re-exports for convenience
pub use error::{BuildError, CodecError, Error, ExecutionError, Result};
pub use value::Value;
pub use data_type::SqlType;
pub use column::{FieldSchema, KeyRole, Length, PrimaryKey, TableSchema};
pub use row::{Row, RowIndex, RowSet};

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, sql_type: SqlType, key: KeyRole) -> FieldSchema {
        FieldSchema {
            name: name.to_string(),
            sql_type,
            length: None,
            values: None,
            nullable: false,
            default: None,
            extra: String::new(),
            auto_increment: false,
            key,
        }
    }

    fn users() -> TableSchema {
        TableSchema::new(
            "users".to_string(),
            vec![
                field("id", SqlType::Int, KeyRole::Primary),
                field("active", SqlType::Bit, KeyRole::None),
                field("created", SqlType::DateTime, KeyRole::None),
                field("tags", SqlType::Set, KeyRole::None),
            ],
        )
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Text("hello".to_string()).to_string(), "hello");
        assert_eq!(Value::Boolean(true).to_string(), "true");
    }

    #[test]
    fn test_row_decode_with_schema() {
        let row = Row::from_pairs([
            ("id", Value::Integer(7)),
            ("active", Value::Integer(1)),
            ("created", Value::from("2013-06-05 21:52:40")),
            ("tags", Value::from("a,b")),
            ("extra", Value::from("untouched")),
        ]);

        let decoded = row.decode_with(&users()).unwrap();
        assert_eq!(decoded["id"], Value::Integer(7));
        assert_eq!(decoded["active"], Value::Boolean(true));
        assert_eq!(decoded["created"], Value::Integer(1_370_469_160));
        assert_eq!(decoded["tags"], Value::List(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(decoded["extra"], Value::from("untouched"));
    }

    #[test]
    fn test_schema_predicates_and_key() {
        let schema = users();
        assert!(schema.is_integral("id"));
        assert!(schema.is_boolean("active"));
        assert!(schema.is_temporal("created"));
        assert!(schema.is_set("tags"));
        assert!(!schema.is_stringy("missing"));
        assert_eq!(schema.primary_key(), PrimaryKey::Single("id".to_string()));
    }

    #[test]
    fn test_errors_convert_into_crate_error() {
        let err: Error = BuildError::MissingKind.into();
        assert!(matches!(err, Error::Build(BuildError::MissingKind)));

        let err: Error = CodecError::InvalidInteger("x".to_string()).into();
        assert_eq!(err.to_string(), "Cannot interpret x as an integer");
    }
}
