// salesmart-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::quality::{QualityDefaults, QualityPolicy, QualityRule};

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,
    pub version: String,

    #[serde(rename = "config-paths", default = "default_config_paths")]
    pub config_paths: Vec<String>,

    #[serde(rename = "raw-path", default = "default_raw_path")]
    pub raw_path: String,

    #[serde(rename = "warehouse-path", default = "default_warehouse_path")]
    pub warehouse_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    #[validate(nested)]
    #[serde(default)]
    pub quality: QualityConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct QualityConfig {
    #[serde(default)]
    pub policy: QualityPolicy,

    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_max_null_pct")]
    pub max_null_pct: f64,

    #[serde(default = "default_min_rows")]
    pub min_rows: usize,

    /// Empty means the built-in suite.
    #[validate(nested)]
    #[serde(default)]
    pub checks: Vec<QualityRule>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            policy: QualityPolicy::default(),
            max_null_pct: default_max_null_pct(),
            min_rows: default_min_rows(),
            checks: Vec::new(),
        }
    }
}

impl QualityConfig {
    pub fn defaults(&self) -> QualityDefaults {
        QualityDefaults {
            max_null_pct: self.max_null_pct,
            min_rows: self.min_rows,
        }
    }
}

fn default_config_paths() -> Vec<String> {
    vec!["config".to_string()]
}
fn default_raw_path() -> String {
    "data/raw".to_string()
}
fn default_warehouse_path() -> String {
    "target/warehouse.duckdb".to_string()
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_max_null_pct() -> f64 {
    5.0
}
fn default_min_rows() -> usize {
    1
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config: ProjectConfig = serde_yaml::from_str("name: shop\nversion: '1.0'\n").unwrap();
        assert_eq!(config.raw_path, "data/raw");
        assert_eq!(config.warehouse_path, "target/warehouse.duckdb");
        assert_eq!(config.quality.policy, QualityPolicy::Warn);
        assert_eq!(config.quality.max_null_pct, 5.0);
        assert!(config.quality.checks.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let yaml = "name: shop\nversion: '1.0'\nquality:\n  max_null_pct: 120\n";
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}
