// salesmart-core/src/domain/table.rs

//! In-memory tabular model shared by every stage of the pipeline.
//!
//! A [`Table`] is a named, ordered list of typed columns plus rows of
//! [`Value`]s. Stages never mutate a table they received: the builder-style
//! methods below take `self` by value and hand back a new table.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Storage type of a column, mirrored one-to-one by the warehouse DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    BigInt,
    Double,
    Timestamp,
    Varchar,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Varchar => "VARCHAR",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnType::BigInt | ColumnType::Double => ColumnKind::Numeric,
            ColumnType::Timestamp => ColumnKind::Datetime,
            ColumnType::Varchar => ColumnKind::Text,
        }
    }
}

/// Coarse kind used by the data-type quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Datetime,
    #[serde(alias = "string")]
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Datetime => "datetime",
            ColumnKind::Text => "text",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value; text is not parsed here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Normalized join/dedup key. Blank text and null have no key.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                Some(format!("{}", *f as i64))
            }
            Value::Float(f) if f.is_finite() => Some(f.to_string()),
            Value::Float(_) => None,
            Value::Timestamp(ts) => Some(ts.to_string()),
        }
    }

    /// Hashable identity used when comparing whole tuples of values.
    pub(crate) fn identity(&self) -> ValueIdentity {
        match self {
            Value::Null => ValueIdentity::Null,
            Value::Int(i) => ValueIdentity::Int(*i),
            Value::Float(f) => ValueIdentity::Float(f.to_bits()),
            Value::Text(s) => ValueIdentity::Text(s.clone()),
            Value::Timestamp(ts) => ValueIdentity::Timestamp(*ts),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueIdentity {
    Null,
    Int(i64),
    Float(u64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => f.write_str(s),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table and checks every row against the column count.
    pub fn with_rows(
        name: impl Into<String>,
        columns: Vec<Column>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let width = columns.len();
        if let Some(pos) = rows.iter().position(|r| r.len() != width) {
            return Err(DomainError::SchemaError(format!(
                "row {} of '{}' has {} values, expected {}",
                pos,
                name,
                rows[pos].len(),
                width
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.name.as_str())) {
            return Err(DomainError::SchemaError(format!(
                "duplicate column '{}' in '{}'",
                dup.name, name
            )));
        }
        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    /// Convenience for raw extracts: every column is text.
    pub fn from_text_records(
        name: impl Into<String>,
        headers: &[&str],
        records: Vec<Vec<Value>>,
    ) -> Result<Self, DomainError> {
        let columns = headers
            .iter()
            .map(|h| Column::new(*h, ColumnType::Varchar))
            .collect();
        Self::with_rows(name, columns, records)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Keeps rows for which `keep` returns true, preserving order.
    pub fn filter_rows<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.rows.retain(|r| keep(r));
        self
    }

    /// Rewrites one column through `f` and retypes it. No-op when absent.
    pub fn map_column<F>(mut self, name: &str, data_type: ColumnType, mut f: F) -> Self
    where
        F: FnMut(&Value) -> Value,
    {
        if let Some(idx) = self.column_index(name) {
            self.columns[idx].data_type = data_type;
            for row in &mut self.rows {
                row[idx] = f(&row[idx]);
            }
        }
        self
    }

    /// Replaces a column in place or appends it. `values` must have one entry per row.
    pub fn set_column(
        mut self,
        name: &str,
        data_type: ColumnType,
        values: Vec<Value>,
    ) -> Result<Self, DomainError> {
        if values.len() != self.rows.len() {
            return Err(DomainError::SchemaError(format!(
                "column '{}' has {} values for {} rows in '{}'",
                name,
                values.len(),
                self.rows.len(),
                self.name
            )));
        }
        match self.column_index(name) {
            Some(idx) => {
                self.columns[idx].data_type = data_type;
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                self.columns.push(Column::new(name, data_type));
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
        Ok(self)
    }

    /// Projects onto the listed columns that exist, in the listed order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Table {
        let indices: Vec<usize> = names
            .iter()
            .filter_map(|n| self.column_index(n.as_ref()))
            .collect();
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|r| indices.iter().map(|&i| r[i].clone()).collect())
            .collect();
        Table {
            name: self.name.clone(),
            columns,
            rows,
        }
    }

    /// Keeps the first row per key tuple. Returns the table and the number of rows removed.
    pub fn dedup_by(self, key_columns: &[&str]) -> (Self, usize) {
        let indices: Vec<usize> = key_columns
            .iter()
            .filter_map(|c| self.column_index(c))
            .collect();
        let before = self.rows.len();
        let mut seen: HashSet<Vec<ValueIdentity>> = HashSet::with_capacity(before);
        let table = self.filter_rows(|row| seen.insert(indices.iter().map(|&i| row[i].identity()).collect()));
        let removed = before - table.rows.len();
        (table, removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_text_records(
            "sample",
            &["id", "label"],
            vec![
                vec!["1".into(), "a".into()],
                vec!["2".into(), Value::Null],
                vec!["1".into(), "c".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_with_rows_rejects_ragged_rows() {
        let res = Table::with_rows(
            "t",
            vec![Column::new("a", ColumnType::Varchar)],
            vec![vec![Value::Null, Value::Null]],
        );
        assert!(matches!(res, Err(DomainError::SchemaError(_))));
    }

    #[test]
    fn test_with_rows_rejects_duplicate_columns() {
        let res = Table::with_rows(
            "t",
            vec![
                Column::new("a", ColumnType::Varchar),
                Column::new("a", ColumnType::Double),
            ],
            vec![],
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_select_skips_absent_columns() {
        let projected = sample().select(&["label", "missing", "id"]);
        assert_eq!(projected.column_names(), vec!["label", "id"]);
        assert_eq!(projected.row_count(), 3);
        assert_eq!(projected.value(0, "id"), Some(&Value::from("1")));
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let (table, removed) = sample().dedup_by(&["id"]);
        assert_eq!(removed, 1);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(0, "label"), Some(&Value::from("a")));
    }

    #[test]
    fn test_set_column_replaces_in_place() {
        let table = sample()
            .set_column("id", ColumnType::BigInt, vec![Value::Int(1), Value::Int(2), Value::Int(3)])
            .unwrap();
        assert_eq!(table.column_names(), vec!["id", "label"]);
        assert_eq!(table.column("id").unwrap().data_type, ColumnType::BigInt);
    }

    #[test]
    fn test_set_column_length_mismatch() {
        assert!(sample().set_column("x", ColumnType::Double, vec![]).is_err());
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(Value::from(" C1 ").as_key(), Some("C1".to_string()));
        assert_eq!(Value::from("   ").as_key(), None);
        assert_eq!(Value::Float(7.0).as_key(), Some("7".to_string()));
        assert_eq!(Value::Int(7).as_key(), Some("7".to_string()));
        assert_eq!(Value::Null.as_key(), None);
    }
}
