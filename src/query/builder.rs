use serde::{Deserialize, Serialize};
use std::fmt;
use crate::core::{BuildError, Value};
use super::clause::{Clause, Join};

pub const DEFAULT_JOIN: &str = "LEFT";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::Select)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fluent SQL statement builder.
///
/// Every clause that carries `?` wildcards is checked against its parameters when it is
/// added, so a builder that was assembled without error always renders a statement whose
/// placeholders line up with [`Query::parameters`].
///
/// ```
/// use tinydb::{params, Query};
///
/// let query = Query::new()
///     .select("*")
///     .from("users")
///     .filter("age > ?", params![21])?
///     .order_by("name ASC", params![])?
///     .limit(10);
///
/// assert_eq!(query.render()?, "SELECT * FROM `users` WHERE (age > ?) ORDER BY name ASC LIMIT 10;");
/// assert_eq!(query.parameters(), params![21]);
/// # Ok::<(), tinydb::BuildError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub(crate) kind: Option<StatementKind>,

    pub(crate) from: Option<String>,
    pub(crate) into: Option<String>,
    pub(crate) update: Option<String>,

    pub(crate) selects: Vec<String>,

    pub(crate) columns: Vec<String>,
    pub(crate) values: Vec<Value>,

    pub(crate) sets: Vec<Clause>,
    pub(crate) joins: Vec<Join>,
    pub(crate) wheres: Vec<Clause>,
    pub(crate) havings: Vec<Clause>,
    pub(crate) group_bys: Vec<String>,
    pub(crate) order_bys: Vec<Clause>,
    pub(crate) unions: Vec<String>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes this a SELECT and adds one select expression.
    #[must_use]
    pub fn select(mut self, expr: impl Into<String>) -> Self {
        self.kind = Some(StatementKind::Select);
        self.selects.push(expr.into());
        self
    }

    /// Makes this a SELECT of every column of the FROM table.
    #[must_use]
    pub fn select_all(mut self) -> Self {
        self.kind = Some(StatementKind::Select);
        self
    }

    #[must_use]
    pub fn insert(mut self) -> Self {
        self.kind = Some(StatementKind::Insert);
        self
    }

    #[must_use]
    pub fn update(mut self, table: impl Into<String>) -> Self {
        self.kind = Some(StatementKind::Update);
        self.update = Some(table.into());
        self
    }

    #[must_use]
    pub fn delete(mut self) -> Self {
        self.kind = Some(StatementKind::Delete);
        self
    }

    #[must_use]
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = Some(table.into());
        self
    }

    /// Sets the INSERT target table.
    #[must_use]
    pub fn into_table(mut self, table: impl Into<String>) -> Self {
        self.into = Some(table.into());
        self
    }

    /// Sets the INSERT target table and the columns the positional values fill.
    #[must_use]
    pub fn into_columns<I, S>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.into = Some(table.into());
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Positional INSERT values, each bound as one parameter. Replaces earlier values.
    #[must_use]
    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a SET assignment, excluding "SET ".
    pub fn set<I, V>(mut self, clause: impl Into<String>, params: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.sets.push(Clause::checked("SET", clause, params)?);
        Ok(self)
    }

    /// Adds a LEFT JOIN; `clause` excludes the "LEFT JOIN " prefix.
    pub fn join<I, V>(self, clause: impl Into<String>, params: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.join_as(DEFAULT_JOIN, clause, params)
    }

    /// Adds a JOIN of the given type (LEFT, RIGHT, INNER, OUTER, ...).
    pub fn join_as<I, V>(
        mut self,
        kind: impl Into<String>,
        clause: impl Into<String>,
        params: I,
    ) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.joins.push(Join {
            kind: kind.into(),
            clause: Clause::checked("JOIN", clause, params)?,
        });
        Ok(self)
    }

    /// Adds a WHERE condition, excluding "WHERE ". Conditions are ANDed together.
    pub fn filter<I, V>(mut self, clause: impl Into<String>, params: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.wheres.push(Clause::checked("WHERE", clause, params)?);
        Ok(self)
    }

    /// Adds a HAVING condition, excluding "HAVING ". Conditions are ANDed together.
    pub fn having<I, V>(mut self, clause: impl Into<String>, params: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.havings.push(Clause::checked("HAVING", clause, params)?);
        Ok(self)
    }

    #[must_use]
    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_bys.push(expr.into());
        self
    }

    pub fn order_by<I, V>(mut self, expr: impl Into<String>, params: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.order_bys.push(Clause::checked("ORDER BY", expr, params)?);
        Ok(self)
    }

    /// Adds a raw SELECT to UNION with this one.
    #[must_use]
    pub fn union(mut self, select: impl Into<String>) -> Self {
        self.unions.push(select.into());
        self
    }

    #[must_use]
    pub const fn limit(mut self, count: u64) -> Self {
        self.offset = None;
        self.limit = Some(count);
        self
    }

    /// `LIMIT offset,count`
    #[must_use]
    pub const fn limit_offset(mut self, offset: u64, count: u64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(count);
        self
    }

    #[must_use]
    pub const fn clear_limit(mut self) -> Self {
        self.offset = None;
        self.limit = None;
        self
    }

    // Introspection

    #[must_use]
    pub const fn kind(&self) -> Option<StatementKind> {
        self.kind
    }

    /// The table the statement reads from or writes to.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        match self.kind {
            Some(StatementKind::Insert) => self.into.as_deref(),
            Some(StatementKind::Update) => self.update.as_deref(),
            _ => self.from.as_deref(),
        }
    }

    #[must_use]
    pub const fn has_from(&self) -> bool {
        self.from.is_some()
    }

    #[must_use]
    pub fn selects(&self) -> &[String] {
        &self.selects
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values_list(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn sets(&self) -> &[Clause] {
        &self.sets
    }

    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    #[must_use]
    pub fn wheres(&self) -> &[Clause] {
        &self.wheres
    }

    #[must_use]
    pub fn havings(&self) -> &[Clause] {
        &self.havings
    }

    #[must_use]
    pub fn group_bys(&self) -> &[String] {
        &self.group_bys
    }

    #[must_use]
    pub fn order_bys(&self) -> &[Clause] {
        &self.order_bys
    }

    #[must_use]
    pub fn unions(&self) -> &[String] {
        &self.unions
    }

    #[must_use]
    pub const fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        self.offset
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(sql) => f.write_str(&sql),
            Err(e) => write!(f, "-- {e}"),
        }
    }
}
