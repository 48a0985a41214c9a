use std::sync::Arc;
use crate::cache::{ResultCache, SchemaCache};
use crate::config::Settings;
use crate::connection::Connection;
use crate::core::{BuildError, Result, RowSet};
use crate::query::{Query, StatementKind};
use super::{ExecOptions, Output};

/// Runs built statements.
///
/// Selects go to the read connection (the write connection when no read handle is set)
/// and are served from the result cache when possible; inserts, updates and deletes go to
/// the write connection and invalidate the cached results of their table.
pub struct Executor {
    write: Arc<dyn Connection>,
    read: Option<Arc<dyn Connection>>,
    results: Arc<ResultCache>,
    schemas: Arc<SchemaCache>,
    settings: Settings,
}

impl Executor {
    /// Executor with fresh caches and default settings.
    pub fn new(write: Arc<dyn Connection>) -> Self {
        Self {
            write,
            read: None,
            results: Arc::new(ResultCache::new()),
            schemas: Arc::new(SchemaCache::new()),
            settings: Settings::default(),
        }
    }

    /// Routes selects to a dedicated read handle (replica).
    #[must_use]
    pub fn with_read(mut self, read: Arc<dyn Connection>) -> Self {
        self.read = Some(read);
        self
    }

    /// Shares a result cache with other executors.
    #[must_use]
    pub fn with_result_cache(mut self, results: Arc<ResultCache>) -> Self {
        self.results = results;
        self
    }

    #[must_use]
    pub fn with_schema_cache(mut self, schemas: Arc<SchemaCache>) -> Self {
        self.schemas = schemas;
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn read_connection(&self) -> &dyn Connection {
        self.read.as_deref().unwrap_or(self.write.as_ref())
    }

    pub fn write_connection(&self) -> &dyn Connection {
        self.write.as_ref()
    }

    #[must_use]
    pub fn results(&self) -> &Arc<ResultCache> {
        &self.results
    }

    #[must_use]
    pub fn schemas(&self) -> &Arc<SchemaCache> {
        &self.schemas
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Options taken from the settings.
    #[must_use]
    pub const fn default_options(&self) -> ExecOptions {
        ExecOptions {
            magic: self.settings.magic,
            use_cache: self.settings.cache_results,
        }
    }

    pub fn execute(&self, query: &Query) -> Result<Output> {
        self.execute_with(query, self.default_options())
    }

    pub fn execute_with(&self, query: &Query, options: ExecOptions) -> Result<Output> {
        let kind = query.kind().ok_or(BuildError::MissingKind)?;
        match kind {
            StatementKind::Select => {
                let rows = self.select(query, options.use_cache)?;
                Ok(shape(query, rows, options.magic))
            }
            StatementKind::Insert | StatementKind::Update | StatementKind::Delete => self.modify(query, kind),
        }
    }

    /// Every row a select returns, never collapsed. Writes yield an empty set.
    pub fn fetch(&self, query: &Query) -> Result<RowSet> {
        let options = ExecOptions {
            magic: false,
            ..self.default_options()
        };
        Ok(self.execute_with(query, options)?.into_rows().unwrap_or_default())
    }

    fn select(&self, query: &Query, use_cache: bool) -> Result<RowSet> {
        if use_cache {
            if let Some(rows) = self.results.get(query) {
                return Ok(rows);
            }
        }
        // Taken before the read so a write finishing meanwhile keeps these rows out of the cache.
        let generation = query.table().map_or(0, |table| self.results.generation(table));

        let sql = query.render()?;
        let params = query.parameters();
        tracing::debug!(%sql, params = params.len(), "executing select");

        let rows = self
            .read_connection()
            .query(&sql, &params)
            .map_err(|e| e.into_execution(&sql, &params))?;
        let rows = RowSet::new(rows);

        if use_cache {
            self.results.add_at(query, &rows, generation);
        }
        Ok(rows)
    }

    fn modify(&self, query: &Query, kind: StatementKind) -> Result<Output> {
        let sql = query.render()?;
        let params = query.parameters();
        tracing::debug!(%sql, params = params.len(), "executing {kind}");

        let outcome = self.write.execute(&sql, &params);

        // The table may have changed even when the driver reports an error.
        if let Some(table) = query.table() {
            self.results.invalidate(table);
        }

        let outcome = outcome.map_err(|e| e.into_execution(&sql, &params))?;
        Ok(match kind {
            StatementKind::Insert => Output::InsertId(outcome.last_insert_id),
            _ => Output::Done,
        })
    }
}

// Magic result shaping, in priority order: a lone selected value, then a LIMIT 1 row,
// then the whole set.
fn shape(query: &Query, rows: RowSet, magic: bool) -> Output {
    if !magic {
        return Output::Rows(rows);
    }

    if query.selects().len() == 1 && rows.len() == 1 && rows[0].len() == 1 {
        return Output::Scalar(rows[0].values()[0].clone());
    }

    if query.get_limit() == Some(1) {
        if let Some(row) = rows.first() {
            return Output::Row(row.clone());
        }
    }

    Output::Rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Row, Value};
    use crate::params;

    fn rows(n: usize, columns: usize) -> RowSet {
        RowSet::new(
            (0..n)
                .map(|i| Row::from_pairs((0..columns).map(|c| (format!("c{c}"), Value::Integer(i as i64)))))
                .collect(),
        )
    }

    fn select(expr: &str) -> Query {
        Query::new().select(expr).from("t")
    }

    #[test]
    fn test_shape_scalar() {
        let out = shape(&select("COUNT(*)"), rows(1, 1), true);
        assert_eq!(out, Output::Scalar(Value::Integer(0)));
    }

    #[test]
    fn test_shape_scalar_needs_single_select_expression() {
        let q = select("a").select("b");
        assert!(matches!(shape(&q, rows(1, 1), true), Output::Rows(_)));
        assert!(matches!(shape(&Query::new().select_all().from("t"), rows(1, 1), true), Output::Rows(_)));
    }

    #[test]
    fn test_shape_limit_one_row() {
        let out = shape(&select("*").limit(1), rows(1, 3), true);
        assert!(matches!(out, Output::Row(ref row) if row.len() == 3));

        // the scalar rule wins over the row rule
        let out = shape(&select("name").limit(1), rows(1, 1), true);
        assert!(matches!(out, Output::Scalar(_)));

        // nothing found
        assert_eq!(shape(&select("*").limit(1), rows(0, 3), true), Output::Rows(RowSet::default()));
    }

    #[test]
    fn test_shape_without_magic() {
        assert_eq!(shape(&select("COUNT(*)"), rows(1, 1), false), Output::Rows(rows(1, 1)));
        assert_eq!(shape(&select("*").limit(1), rows(1, 2), false), Output::Rows(rows(1, 2)));
    }

    #[test]
    fn test_shape_many_rows() {
        assert_eq!(shape(&select("*"), rows(3, 2), true), Output::Rows(rows(3, 2)));
        assert_eq!(
            shape(&select("x").filter("x > ?", params![1]).unwrap(), rows(2, 1), true),
            Output::Rows(rows(2, 1))
        );
    }
}
