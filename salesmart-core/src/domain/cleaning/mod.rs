// salesmart-core/src/domain/cleaning/mod.rs

//! Per-entity cleaners.
//!
//! Every `clean_*` operation borrows its raw table, works on an owned copy
//! through the by-value builders of [`Table`], and returns a fresh table with
//! the metrics describing what was dropped. Feeding a cleaned table back in
//! yields the same table.

mod customers;
mod order_items;
mod orders;
pub mod policy;
mod products;

use serde::{Deserialize, Serialize};
use tracing::{Span, info, warn};

use crate::domain::error::DomainError;
use crate::domain::table::{ColumnType, Table, Value};
use policy::{Coerced, coerce_numeric, parse_timestamp, text_of, title_case};

/// Counters reported by every cleaner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanMetrics {
    pub entity: String,
    pub input_rows: usize,
    pub dropped_missing_key: usize,
    pub invalid_numeric: usize,
    pub duplicates_removed: usize,
    pub dropped_out_of_range: usize,
    pub output_rows: usize,
}

#[derive(Debug, Clone)]
pub struct Cleaned {
    pub table: Table,
    pub metrics: CleanMetrics,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum TextCase {
    Lower,
    Title,
}

pub struct Cleaner {
    span: Span,
}

impl Cleaner {
    pub fn new(span: Span) -> Self {
        Self { span }
    }
}

/// Working state threaded through the steps of one cleaning run.
pub(crate) struct CleanRun {
    table: Table,
    metrics: CleanMetrics,
}

impl CleanRun {
    pub(crate) fn start(raw: &Table, entity: &str, required: &[&str]) -> Result<Self, DomainError> {
        if let Some(missing) = required.iter().find(|c| !raw.has_column(c)) {
            return Err(DomainError::MissingKeyColumn {
                table: entity.to_string(),
                column: (*missing).to_string(),
            });
        }
        Ok(Self {
            table: raw.clone().renamed(entity),
            metrics: CleanMetrics {
                entity: entity.to_string(),
                input_rows: raw.row_count(),
                ..Default::default()
            },
        })
    }

    pub(crate) fn warn_absent(self, expected: &[&str]) -> Self {
        for col in expected.iter().filter(|c| !self.table.has_column(c)) {
            warn!(entity = %self.metrics.entity, column = %col, "Expected column absent, skipping its rules");
        }
        self
    }

    /// Drops rows with a null or blank value in any of `keys`, then normalizes those keys to text.
    pub(crate) fn drop_missing_keys(mut self, keys: &[&str]) -> Self {
        let indices: Vec<usize> = keys.iter().filter_map(|k| self.table.column_index(k)).collect();
        let before = self.table.row_count();
        self.table = self
            .table
            .filter_rows(|row| indices.iter().all(|&i| row[i].as_key().is_some()));
        self.metrics.dropped_missing_key += before - self.table.row_count();
        for key in keys {
            self = self.normalize_key(key, None);
        }
        self
    }

    /// Text key column; nulls become `default` when given.
    pub(crate) fn normalize_key(mut self, column: &str, default: Option<&str>) -> Self {
        self.table = self.table.map_column(column, ColumnType::Varchar, |v| {
            match (v.as_key(), default) {
                (Some(k), _) => Value::Text(k),
                (None, Some(d)) => Value::from(d),
                (None, None) => Value::Null,
            }
        });
        self
    }

    pub(crate) fn fill_text(mut self, column: &str, default: &str) -> Self {
        self.table = self.table.map_column(column, ColumnType::Varchar, |v| {
            Value::Text(text_of(v).unwrap_or_else(|| default.to_string()))
        });
        self
    }

    pub(crate) fn normalize_text(mut self, column: &str, case: TextCase) -> Self {
        self.table = self.table.map_column(column, ColumnType::Varchar, |v| {
            match text_of(v) {
                Some(s) => Value::Text(match case {
                    TextCase::Lower => s.to_lowercase(),
                    TextCase::Title => title_case(&s),
                }),
                None => Value::Null,
            }
        });
        self
    }

    pub(crate) fn coerce_numeric(mut self, column: &str, default: f64) -> Self {
        let mut invalid = 0;
        self.table = self.table.map_column(column, ColumnType::Double, |v| {
            let coerced = coerce_numeric(v);
            if coerced == Coerced::Invalid {
                invalid += 1;
            }
            Value::Float(coerced.or_default(default))
        });
        self.metrics.invalid_numeric += invalid;
        self
    }

    pub(crate) fn parse_dates(mut self, column: &str) -> Self {
        self.table = self.table.map_column(column, ColumnType::Timestamp, |v| {
            parse_timestamp(v).map(Value::Timestamp).unwrap_or(Value::Null)
        });
        self
    }

    pub(crate) fn dedup(mut self, key: &str) -> Self {
        let (table, removed) = self.table.dedup_by(&[key]);
        self.table = table;
        self.metrics.duplicates_removed += removed;
        self
    }

    /// Drops rows whose value in `column` is below zero.
    pub(crate) fn drop_negative(mut self, column: &str) -> Self {
        if let Some(idx) = self.table.column_index(column) {
            let before = self.table.row_count();
            self.table = self
                .table
                .filter_rows(|row| row[idx].as_f64().is_none_or(|v| v >= 0.0));
            self.metrics.dropped_out_of_range += before - self.table.row_count();
        }
        self
    }

    /// Appends (or recomputes) a column derived from a timestamp column.
    pub(crate) fn derive_from_date<F>(
        mut self,
        source: &str,
        target: &str,
        data_type: ColumnType,
        f: F,
    ) -> Result<Self, DomainError>
    where
        F: Fn(&chrono::NaiveDateTime) -> Value,
    {
        let Some(values) = self.table.column_values(source).map(|it| {
            it.map(|v| match v {
                Value::Timestamp(ts) => f(ts),
                _ => Value::Null,
            })
            .collect::<Vec<_>>()
        }) else {
            return Ok(self);
        };
        self.table = self.table.set_column(target, data_type, values)?;
        Ok(self)
    }

    pub(crate) fn table(&self) -> &Table {
        &self.table
    }

    pub(crate) fn replace_table(mut self, table: Table) -> Self {
        self.table = table;
        self
    }

    pub(crate) fn finish(mut self) -> Cleaned {
        self.metrics.output_rows = self.table.row_count();
        let m = &self.metrics;
        info!(
            entity = %m.entity,
            input = m.input_rows,
            missing_key = m.dropped_missing_key,
            invalid_numeric = m.invalid_numeric,
            duplicates = m.duplicates_removed,
            out_of_range = m.dropped_out_of_range,
            output = m.output_rows,
            "Cleaning completed"
        );
        Cleaned {
            table: self.table,
            metrics: self.metrics,
        }
    }
}
