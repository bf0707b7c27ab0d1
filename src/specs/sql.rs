// SQL fragments produced by specifications.
//
// A fragment is a list of boolean clauses plus the named parameters they
// bind. Clauses reference parameters as `:name`; the map stores names without
// the colon. Parameter names follow `<spec>_<alias>_<field>` so the same
// specification can be applied to several tables in one query.

use std::collections::BTreeMap;
use std::fmt;

use rusqlite::types::{ToSql, ToSqlOutput};
use serde::{Deserialize, Serialize};

use crate::policy::ContentType;

/// A scalar bound to a named parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Integer(i) => write!(f, "{i}"),
            SqlValue::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Integer(i) => i.to_sql(),
            SqlValue::Text(s) => s.to_sql(),
        }
    }
}

/// Build a parameter name scoped to a specification and table alias.
pub fn param_name(spec: &str, displayed: ContentType, field: &str) -> String {
    format!("{spec}_{}_{field}", displayed.alias())
}

/// WHERE clauses plus their bound parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlFilter {
    pub clauses: Vec<String>,
    pub params: BTreeMap<String, SqlValue>,
}

impl SqlFilter {
    /// A single clause with its parameters.
    pub fn clause<I, K>(clause: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, SqlValue)>,
        K: Into<String>,
    {
        Self {
            clauses: vec![clause.into()],
            params: params.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Append another fragment's clauses and parameters.
    ///
    /// # Panics
    ///
    /// If both fragments bind the same name to different values. Two
    /// specifications fighting over a parameter means the generated SQL would
    /// silently filter on the wrong value, so this fails fast.
    pub fn merge(&mut self, other: SqlFilter) {
        for (name, value) in other.params {
            match self.params.get(&name) {
                Some(existing) if *existing != value => panic!(
                    "SQL parameter `{name}` bound twice with different values ({existing} vs {value})"
                ),
                Some(_) => {}
                None => {
                    self.params.insert(name, value);
                }
            }
        }
        self.clauses.extend(other.clauses);
    }

    /// All clauses joined with AND, each wrapped in parentheses.
    /// Returns `None` when there is nothing to filter on.
    pub fn where_sql(&self) -> Option<String> {
        if self.clauses.is_empty() {
            return None;
        }
        Some(
            self.clauses
                .iter()
                .map(|c| format!("({})", c.trim()))
                .collect::<Vec<_>>()
                .join(" AND "),
        )
    }

    /// All clauses joined with OR — used by the interaction gate, where each
    /// clause is a reason to forbid.
    pub fn any_sql(&self) -> Option<String> {
        if self.clauses.is_empty() {
            return None;
        }
        Some(
            self.clauses
                .iter()
                .map(|c| format!("({})", c.trim()))
                .collect::<Vec<_>>()
                .join(" OR "),
        )
    }

    /// Named parameters in the `(":name", value)` shape rusqlite expects.
    pub fn named_params(&self) -> Vec<(String, &SqlValue)> {
        self.params
            .iter()
            .map(|(name, value)| (format!(":{name}"), value))
            .collect()
    }
}
