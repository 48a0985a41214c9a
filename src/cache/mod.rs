// Process-wide caches shared by executors
pub mod column_type;
pub mod result_cache;
pub mod schema_cache;

pub use column_type::{parse_column_type, ColumnType};
pub use result_cache::{shape_hash, CacheEntry, CacheStats, ResultCache, ShapeHash};
pub use schema_cache::{parse_show_columns, show_columns_sql, SchemaCache};
