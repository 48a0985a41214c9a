use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use crate::core::{RowSet, Value};
use crate::query::{Query, StatementKind};

/// Hex SHA-256 over the structure of a select, LIMIT excluded.
pub type ShapeHash = String;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub shape: ShapeHash,
    /// LIMIT the rows were fetched with, `None` when they are the complete result.
    pub limit: Option<u64>,
    pub rows: RowSet,
}

impl CacheEntry {
    fn new(shape: ShapeHash, query: &Query, rows: &RowSet) -> Self {
        Self {
            shape,
            limit: query.get_limit(),
            rows: rows.clone(),
        }
    }

    /// The cached rows if they are enough to answer a query with `requested` as its LIMIT.
    fn serve(&self, requested: Option<u64>) -> Option<RowSet> {
        match (self.limit, requested) {
            (None, None) => Some(self.rows.clone()),
            (None, Some(want)) => Some(self.rows.truncated(want as usize)),
            (Some(have), Some(want)) if have >= want => Some(self.rows.truncated(want as usize)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub tables: usize,
    pub entries: usize,
}

impl CacheStats {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// Entries of one table plus the number of invalidations it has seen.
#[derive(Debug, Default)]
struct TableEntries {
    generation: u64,
    entries: HashMap<ShapeHash, CacheEntry>,
}

/// Select results keyed by (table, shape hash).
///
/// Never fails: anything that can't be hashed or looked up is simply a miss. Entries live
/// until their table is invalidated.
///
/// Entries are filed under the FROM table only. A select that joins other tables is not
/// dropped by writes to those tables; run such queries with the cache disabled when that
/// matters.
///
/// Each invalidation bumps the table's generation. A reader that takes [`generation`]
/// before querying the database and stores through [`add_at`] never caches rows that a
/// concurrent write has made stale.
///
/// [`generation`]: ResultCache::generation
/// [`add_at`]: ResultCache::add_at
#[derive(Debug, Default)]
struct Tables {
    // Number of `clear` calls, added to every table's generation.
    clears: u64,
    by_name: HashMap<String, TableEntries>,
}

#[derive(Debug, Default)]
pub struct ResultCache {
    tables: RwLock<Tables>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Tables {
    fn generation(&self, table: &str) -> u64 {
        self.clears + self.by_name.get(table).map_or(0, |cached| cached.generation)
    }
}

impl ResultCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached rows for a select, or `None` on a miss.
    pub fn get(&self, query: &Query) -> Option<RowSet> {
        let found = Self::key(query).and_then(|(table, shape)| {
            let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
            tables
                .by_name
                .get(table)
                .and_then(|cached| cached.entries.get(&shape))
                .and_then(|entry| entry.serve(query.get_limit()))
        });

        match &found {
            Some(rows) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(table = query.table(), rows = rows.len(), "result cache hit");
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(table = query.table(), "result cache miss");
            }
        }
        found
    }

    /// Invalidation count of `table` (whole-cache clears included), 0 for a fresh cache.
    pub fn generation(&self, table: &str) -> u64 {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.generation(table)
    }

    /// Stores the rows a select returned, replacing any entry with the same shape.
    pub fn add(&self, query: &Query, rows: &RowSet) {
        let Some((table, shape)) = Self::key(query) else {
            return;
        };
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let cached = tables.by_name.entry(table.to_string()).or_default();
        cached.entries.insert(shape.clone(), CacheEntry::new(shape, query, rows));
    }

    /// Like [`ResultCache::add`], but only while the table is still at `generation`.
    /// Returns whether the rows were stored.
    pub fn add_at(&self, query: &Query, rows: &RowSet, generation: u64) -> bool {
        let Some((table, shape)) = Self::key(query) else {
            return false;
        };
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if tables.generation(table) != generation {
            tracing::debug!(table, "dropping rows read before an invalidation");
            return false;
        }
        let cached = tables.by_name.entry(table.to_string()).or_default();
        cached.entries.insert(shape.clone(), CacheEntry::new(shape, query, rows));
        true
    }

    /// Drops every entry cached for `table`.
    pub fn invalidate(&self, table: &str) {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let cached = tables.by_name.entry(table.to_string()).or_default();
        cached.generation += 1;
        if !cached.entries.is_empty() {
            cached.entries.clear();
            tracing::debug!(table, "result cache invalidated");
        }
    }

    /// Drops every entry of every table. Counts as an invalidation of each table.
    pub fn clear(&self) {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables.clears += 1;
        for cached in tables.by_name.values_mut() {
            cached.entries.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            tables: tables.by_name.values().filter(|cached| !cached.entries.is_empty()).count(),
            entries: tables.by_name.values().map(|cached| cached.entries.len()).sum(),
        }
    }

    // Only selects with a table are cache-eligible.
    fn key(query: &Query) -> Option<(&str, ShapeHash)> {
        if query.kind() != Some(StatementKind::Select) {
            return None;
        }
        let table = query.table()?;
        let shape = shape_hash(query)?;
        Some((table, shape))
    }
}

/// Hashes the structure of a query: select list, WHERE, HAVING, ORDER BY, GROUP BY,
/// UNION, JOIN and OFFSET, bound parameters included. LIMIT is left out so a query with a
/// looser limit can answer a tighter one. Clause order is kept as inserted.
///
/// Queries bound to NaN or infinite reals have no shape: JSON has no spelling for them,
/// so they would collide with NULL.
#[must_use]
pub fn shape_hash(query: &Query) -> Option<ShapeHash> {
    if query
        .parameters()
        .iter()
        .any(|v| matches!(v, Value::Real(r) if !r.is_finite()))
    {
        return None;
    }

    let mut combined = String::new();
    combined.push_str(&sub_hash(query.selects())?);
    combined.push_str(&sub_hash(query.wheres())?);
    combined.push_str(&sub_hash(query.havings())?);
    combined.push_str(&sub_hash(query.order_bys())?);
    combined.push_str(&sub_hash(query.group_bys())?);
    combined.push_str(&sub_hash(query.unions())?);
    combined.push_str(&sub_hash(query.joins())?);
    combined.push_str(&sub_hash(&query.offset())?);

    let shape = hex::encode(Sha256::digest(combined.as_bytes()));
    tracing::trace!(%shape, "computed query shape");
    Some(shape)
}

fn sub_hash<T: Serialize + ?Sized>(part: &T) -> Option<String> {
    let serialized = serde_json::to_string(part).ok()?;
    Some(hex::encode(Sha256::digest(serialized.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Row, Value};
    use crate::params;

    fn rows(n: usize) -> RowSet {
        RowSet::new(
            (0..n)
                .map(|i| Row::from_pairs([("r", Value::Integer(i as i64))]))
                .collect(),
        )
    }

    fn query() -> Query {
        Query::new().select("*").from("foo").filter("x = y", params![]).unwrap()
    }

    #[test]
    fn test_select_hit() {
        let cache = ResultCache::new();
        let results = rows(2);
        cache.add(&query(), &results);
        assert_eq!(cache.get(&query()), Some(results));
    }

    #[test]
    fn test_cache_miss() {
        let cache = ResultCache::new();
        assert_eq!(cache.get(&query()), None);

        cache.add(&query(), &rows(2));
        let other = Query::new().select("*").from("foo").filter("x = x", params![]).unwrap();
        assert_eq!(cache.get(&other), None);
    }

    #[test]
    fn test_cache_miss_params() {
        let cache = ResultCache::new();
        let one = Query::new().select("*").from("foo").filter("x = ?", params![1]).unwrap();
        let two = Query::new().select("*").from("foo").filter("x = ?", params![2]).unwrap();
        cache.add(&one, &rows(2));
        assert_eq!(cache.get(&two), None);
        assert_ne!(shape_hash(&one), shape_hash(&two));
    }

    #[test]
    fn test_cache_clear() {
        let cache = ResultCache::new();
        cache.add(&query(), &rows(2));
        cache.invalidate("foo");
        assert_eq!(cache.get(&query()), None);
    }

    #[test]
    fn test_invalidate_leaves_other_tables() {
        let cache = ResultCache::new();
        let bar = Query::new().select("*").from("bar");
        cache.add(&query(), &rows(1));
        cache.add(&bar, &rows(1));
        cache.invalidate("foo");
        assert_eq!(cache.get(&bar), Some(rows(1)));
    }

    #[test]
    fn test_extra_results_hit() {
        let cache = ResultCache::new();
        let results = rows(10);
        cache.add(&query().limit(10), &results);

        assert_eq!(cache.get(&query().limit(1)), Some(rows(1)));
        assert_eq!(cache.get(&query().limit(20)), None);
        // a limited entry can't answer an unlimited query
        assert_eq!(cache.get(&query()), None);
    }

    #[test]
    fn test_unlimited_entry_answers_limited_query() {
        let cache = ResultCache::new();
        cache.add(&query(), &rows(5));
        assert_eq!(cache.get(&query().limit(3)), Some(rows(3)));
        assert_eq!(cache.get(&query().limit(50)), Some(rows(5)));
    }

    #[test]
    fn test_offset_is_part_of_shape() {
        let cache = ResultCache::new();
        cache.add(&query().limit_offset(0, 10), &rows(10));
        assert_eq!(cache.get(&query().limit_offset(10, 10)), None);
        assert!(cache.get(&query().limit_offset(0, 5)).is_some());
    }

    #[test]
    fn test_add_overwrites_same_shape() {
        let cache = ResultCache::new();
        cache.add(&query().limit(10), &rows(10));
        cache.add(&query().limit(2), &rows(2));
        assert_eq!(cache.get(&query().limit(5)), None);
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn test_shape_is_stable_and_order_sensitive() {
        let a = Query::new().select("*").from("t").filter("a = 1", params![]).unwrap().filter("b = 2", params![]).unwrap();
        let b = Query::new().select("*").from("t").filter("a = 1", params![]).unwrap().filter("b = 2", params![]).unwrap();
        let swapped = Query::new().select("*").from("t").filter("b = 2", params![]).unwrap().filter("a = 1", params![]).unwrap();
        assert_eq!(shape_hash(&a), shape_hash(&b));
        assert_ne!(shape_hash(&a), shape_hash(&swapped));
        assert_eq!(shape_hash(&a.clone().limit(3)), shape_hash(&a));
    }

    #[test]
    fn test_non_select_is_never_cached() {
        let cache = ResultCache::new();
        let delete = Query::new().delete().from("foo");
        cache.add(&delete, &rows(1));
        assert_eq!(cache.get(&delete), None);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_rows_read_before_invalidation_are_dropped() {
        let cache = ResultCache::new();
        let generation = cache.generation("foo");
        cache.invalidate("foo");
        assert!(!cache.add_at(&query(), &rows(2), generation));
        assert_eq!(cache.get(&query()), None);

        assert!(cache.add_at(&query(), &rows(2), cache.generation("foo")));
        assert_eq!(cache.get(&query()), Some(rows(2)));
    }

    #[test]
    fn test_generation_counts_invalidations() {
        let cache = ResultCache::new();
        assert_eq!(cache.generation("foo"), 0);
        cache.invalidate("foo");
        cache.invalidate("foo");
        cache.clear();
        assert_eq!(cache.generation("foo"), 3);
        // a table first seen after the clear still moves
        assert_eq!(cache.generation("bar"), 1);
    }

    #[test]
    fn test_non_finite_reals_are_not_cached() {
        let cache = ResultCache::new();
        let nan = Query::new().select("*").from("foo").filter("x = ?", params![f64::NAN]).unwrap();
        let null = Query::new().select("*").from("foo").filter("x = ?", [Value::Null]).unwrap();
        assert_eq!(shape_hash(&nan), None);
        assert!(shape_hash(&null).is_some());

        cache.add(&nan, &rows(1));
        assert_eq!(cache.get(&nan), None);
        assert_eq!(cache.get(&null), None);
    }

    #[test]
    fn test_stats() {
        let cache = ResultCache::new();
        cache.add(&query(), &rows(1));
        cache.get(&query());
        cache.get(&query().limit(1));
        cache.get(&Query::new().select("*").from("nope"));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (2, 1));
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!((stats.tables, stats.entries), (1, 1));
    }
}
