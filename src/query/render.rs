// SQL text and parameter list for a built Query.
//
// Clause order here and in `parameters()` must stay in lock-step, otherwise the
// positional `?`s bind to the wrong values.

use crate::core::{BuildError, Value};
use super::builder::{Query, StatementKind};
use super::clause::{quote_identifier, Clause};

impl Query {
    /// Renders the statement to MySQL-dialect SQL.
    pub fn render(&self) -> Result<String, BuildError> {
        let kind = self.kind.ok_or(BuildError::MissingKind)?;
        let mut parts: Vec<String> = Vec::new();

        match kind {
            StatementKind::Select => {
                let table = require(self.from.as_deref(), kind)?;
                if self.selects.is_empty() {
                    parts.push(format!("SELECT {}.*", quote_identifier(table)));
                } else {
                    parts.push(format!("SELECT {}", self.selects.join(", ")));
                }
                parts.push(format!("FROM {}", quote_identifier(table)));
            }
            StatementKind::Insert => {
                let table = require(self.into.as_deref(), kind)?;
                let mut head = format!("INSERT INTO {}", quote_identifier(table));
                if !self.columns.is_empty() {
                    let cols: Vec<String> = self.columns.iter().map(|c| quote_identifier(c)).collect();
                    head.push_str(&format!("({})", cols.join(", ")));
                }
                parts.push(head);
                if !self.values.is_empty() {
                    let marks = vec!["?"; self.values.len()];
                    parts.push(format!("VALUES ({})", marks.join(", ")));
                }
            }
            StatementKind::Update => {
                let table = require(self.update.as_deref(), kind)?;
                parts.push(format!("UPDATE {}", quote_identifier(table)));
            }
            StatementKind::Delete => {
                let table = require(self.from.as_deref(), kind)?;
                parts.push(format!("DELETE FROM {}", quote_identifier(table)));
            }
        }

        if !self.sets.is_empty() {
            parts.push(format!("SET {}", texts(&self.sets).join(", ")));
        }

        for join in &self.joins {
            parts.push(format!("{} JOIN {}", join.kind, join.clause.text));
        }

        if let Some(wheres) = conditions("WHERE", &self.wheres) {
            parts.push(wheres);
        }

        if !self.group_bys.is_empty() {
            parts.push(format!("GROUP BY {}", self.group_bys.join(", ")));
        }

        if let Some(havings) = conditions("HAVING", &self.havings) {
            parts.push(havings);
        }

        if !self.order_bys.is_empty() {
            parts.push(format!("ORDER BY {}", texts(&self.order_bys).join(", ")));
        }

        for union in &self.unions {
            parts.push(format!("UNION ({union})"));
        }

        match (self.offset, self.limit) {
            (Some(offset), Some(limit)) => parts.push(format!("LIMIT {offset},{limit}")),
            (None, Some(limit)) => parts.push(format!("LIMIT {limit}")),
            _ => {}
        }

        Ok(format!("{};", parts.join(" ")))
    }

    /// Bound parameters in placeholder order: VALUES, SET, JOIN, WHERE, HAVING, ORDER BY.
    #[must_use]
    pub fn parameters(&self) -> Vec<Value> {
        let mut params = Vec::new();
        if matches!(self.kind, Some(StatementKind::Insert)) {
            params.extend(self.values.iter().cloned());
        }
        params.extend(self.sets.iter().flat_map(|c| c.params.iter().cloned()));
        params.extend(self.joins.iter().flat_map(|j| j.clause.params.iter().cloned()));
        params.extend(self.wheres.iter().flat_map(|c| c.params.iter().cloned()));
        params.extend(self.havings.iter().flat_map(|c| c.params.iter().cloned()));
        params.extend(self.order_bys.iter().flat_map(|c| c.params.iter().cloned()));
        params
    }
}

fn require(table: Option<&str>, kind: StatementKind) -> Result<&str, BuildError> {
    table.ok_or(BuildError::MissingTarget { kind: kind.as_str() })
}

fn texts(clauses: &[Clause]) -> Vec<&str> {
    clauses.iter().map(|c| c.text.as_str()).collect()
}

// `WHERE (a) AND (b)`
fn conditions(keyword: &str, clauses: &[Clause]) -> Option<String> {
    if clauses.is_empty() {
        return None;
    }
    let parenthesized: Vec<String> = clauses.iter().map(|c| format!("({})", c.text)).collect();
    Some(format!("{keyword} {}", parenthesized.join(" AND ")))
}
