// salesmart-core/src/domain/quality/report.rs

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::rule::CheckKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCheckResult {
    pub check: CheckKind,
    pub table: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    /// Measured value per column (null %, duplicate count, violations, rows).
    #[serde(default)]
    pub measurements: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub timestamp: String,
    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub checks_passed: Vec<QualityCheckResult>,
    pub checks_failed: Vec<QualityCheckResult>,
}

impl QualityReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "DATA QUALITY REPORT")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Timestamp:    {}", self.timestamp)?;
        writeln!(f, "Total checks: {}", self.total_checks)?;
        writeln!(f, "Passed:       {}", self.passed)?;
        writeln!(f, "Failed:       {}", self.failed)?;
        writeln!(f, "Success rate: {:.2}%", self.success_rate)?;

        if !self.checks_failed.is_empty() {
            writeln!(f, "{}", "-".repeat(60))?;
            writeln!(f, "FAILED CHECKS:")?;
            for check in &self.checks_failed {
                writeln!(f, "  {} - {}", check.check.to_string().to_uppercase(), check.table)?;
                for issue in &check.issues {
                    writeln!(f, "    ~ {}", issue)?;
                }
            }
        }
        write!(f, "{}", rule)
    }
}
