// salesmart-core/src/domain/quality/mod.rs

//! Data quality gate.
//!
//! Checks never fail with an error: each one records a [`QualityCheckResult`]
//! in the passed or failed list and returns the outcome as a boolean.

mod report;
mod rule;

pub use report::{QualityCheckResult, QualityReport};
pub use rule::{CheckKind, QualityPolicy, QualityRule, RangeBound};

use std::collections::{BTreeMap, HashSet};

use chrono::{SecondsFormat, Utc};
use tracing::{Span, info, warn};

use crate::domain::table::{ColumnKind, Table};

/// Thresholds applied when a rule does not carry its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityDefaults {
    pub max_null_pct: f64,
    pub min_rows: usize,
}

impl Default for QualityDefaults {
    fn default() -> Self {
        Self {
            max_null_pct: 5.0,
            min_rows: 1,
        }
    }
}

pub struct QualityGate {
    span: Span,
    checks_passed: Vec<QualityCheckResult>,
    checks_failed: Vec<QualityCheckResult>,
}

impl QualityGate {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            checks_passed: Vec::new(),
            checks_failed: Vec::new(),
        }
    }

    fn record(
        &mut self,
        check: CheckKind,
        table: &str,
        issues: Vec<String>,
        measurements: BTreeMap<String, f64>,
    ) -> bool {
        let passed = issues.is_empty();
        if passed {
            info!(%check, table, "Quality check PASSED");
        } else {
            warn!(%check, table, ?issues, "Quality check FAILED");
        }
        let result = QualityCheckResult {
            check,
            table: table.to_string(),
            passed,
            issues,
            measurements,
        };
        if passed {
            self.checks_passed.push(result);
        } else {
            self.checks_failed.push(result);
        }
        passed
    }

    pub fn check_null_values<S: AsRef<str>>(
        &mut self,
        table: &Table,
        name: &str,
        critical_columns: &[S],
        max_null_pct: f64,
    ) -> bool {
        let _enter = self.span.clone().entered();
        let mut issues = Vec::new();
        let mut measurements = BTreeMap::new();
        let rows = table.row_count();

        for col in critical_columns.iter().map(AsRef::as_ref) {
            let Some(values) = table.column_values(col) else {
                issues.push(format!("Column '{}' is missing from {}", col, name));
                continue;
            };
            let nulls = values.filter(|v| v.is_null()).count();
            let pct = if rows == 0 {
                0.0
            } else {
                nulls as f64 * 100.0 / rows as f64
            };
            measurements.insert(col.to_string(), pct);
            if pct > max_null_pct {
                issues.push(format!(
                    "Column '{}' has {:.2}% null values (threshold: {}%)",
                    col, pct, max_null_pct
                ));
            }
        }
        self.record(CheckKind::NullValues, name, issues, measurements)
    }

    pub fn check_duplicates<S: AsRef<str>>(&mut self, table: &Table, name: &str, key_columns: &[S]) -> bool {
        let _enter = self.span.clone().entered();
        let keys: Vec<&str> = key_columns.iter().map(AsRef::as_ref).collect();
        let missing: Vec<&str> = keys.iter().copied().filter(|k| !table.has_column(k)).collect();
        if !missing.is_empty() {
            let issues = vec![format!("Key columns {:?} are missing from {}", missing, name)];
            return self.record(CheckKind::Duplicates, name, issues, BTreeMap::new());
        }

        let indices: Vec<usize> = keys.iter().filter_map(|k| table.column_index(k)).collect();
        let mut seen = HashSet::with_capacity(table.row_count());
        let duplicates = table
            .rows()
            .iter()
            .filter(|row| !seen.insert(indices.iter().map(|&i| row[i].identity()).collect::<Vec<_>>()))
            .count();

        let mut measurements = BTreeMap::new();
        measurements.insert(keys.join(","), duplicates as f64);
        let issues = if duplicates > 0 {
            vec![format!("Found {} duplicate rows", duplicates)]
        } else {
            Vec::new()
        };
        self.record(CheckKind::Duplicates, name, issues, measurements)
    }

    pub fn check_value_ranges(&mut self, table: &Table, name: &str, ranges: &BTreeMap<String, RangeBound>) -> bool {
        let _enter = self.span.clone().entered();
        let mut issues = Vec::new();
        let mut measurements = BTreeMap::new();

        for (col, bound) in ranges {
            let Some(values) = table.column_values(col) else {
                continue;
            };
            let numbers: Vec<f64> = values.filter_map(|v| v.as_f64()).collect();
            let mut violations = 0;
            if let Some(min) = bound.min {
                let below = numbers.iter().filter(|v| **v < min).count();
                if below > 0 {
                    issues.push(format!("Column '{}' has {} values < {}", col, below, min));
                }
                violations += below;
            }
            if let Some(max) = bound.max {
                let above = numbers.iter().filter(|v| **v > max).count();
                if above > 0 {
                    issues.push(format!("Column '{}' has {} values > {}", col, above, max));
                }
                violations += above;
            }
            measurements.insert(col.clone(), violations as f64);
        }
        self.record(CheckKind::ValueRanges, name, issues, measurements)
    }

    pub fn check_row_count(&mut self, table: &Table, name: &str, min_rows: usize) -> bool {
        let _enter = self.span.clone().entered();
        let rows = table.row_count();
        let mut measurements = BTreeMap::new();
        measurements.insert("rows".to_string(), rows as f64);
        let issues = if rows < min_rows {
            vec![format!("Only {} rows (minimum: {})", rows, min_rows)]
        } else {
            Vec::new()
        };
        self.record(CheckKind::RowCount, name, issues, measurements)
    }

    pub fn check_data_types(&mut self, table: &Table, name: &str, expected: &BTreeMap<String, ColumnKind>) -> bool {
        let _enter = self.span.clone().entered();
        let mut issues = Vec::new();
        for (col, kind) in expected {
            match table.column(col) {
                None => issues.push(format!("Column '{}' is missing from {}", col, name)),
                Some(c) if c.data_type.kind() != *kind => issues.push(format!(
                    "Column '{}' expected {}, got {}",
                    col,
                    kind,
                    c.data_type.sql_type()
                )),
                Some(_) => {}
            }
        }
        self.record(CheckKind::DataTypes, name, issues, BTreeMap::new())
    }

    /// Dispatches a configured rule to its check. `table` is `None` when the rule
    /// names a table the run did not produce.
    pub fn apply_rule(&mut self, rule: &QualityRule, table: Option<&Table>, defaults: &QualityDefaults) -> bool {
        let Some(table) = table else {
            let issues = vec![format!("Table '{}' does not exist", rule.table)];
            return self.record(rule.check, &rule.table, issues, BTreeMap::new());
        };
        let name = rule.table.as_str();
        match rule.check {
            CheckKind::NullValues => self.check_null_values(
                table,
                name,
                &rule.columns,
                rule.max_null_pct.unwrap_or(defaults.max_null_pct),
            ),
            CheckKind::Duplicates => self.check_duplicates(table, name, &rule.columns),
            CheckKind::ValueRanges => self.check_value_ranges(table, name, &rule.ranges),
            CheckKind::RowCount => self.check_row_count(table, name, rule.min_rows.unwrap_or(defaults.min_rows)),
            CheckKind::DataTypes => self.check_data_types(table, name, &rule.types),
        }
    }

    pub fn generate_report(&self) -> QualityReport {
        let passed = self.checks_passed.len();
        let failed = self.checks_failed.len();
        let total = passed + failed;
        QualityReport {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            total_checks: total,
            passed,
            failed,
            success_rate: if total > 0 {
                passed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            checks_passed: self.checks_passed.clone(),
            checks_failed: self.checks_failed.clone(),
        }
    }
}
