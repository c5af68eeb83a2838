// salesmart-core/src/domain/quality/rule.rs

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::table::ColumnKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    NullValues,
    Duplicates,
    ValueRanges,
    RowCount,
    DataTypes,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckKind::NullValues => "null_values",
            CheckKind::Duplicates => "duplicates",
            CheckKind::ValueRanges => "value_ranges",
            CheckKind::RowCount => "row_count",
            CheckKind::DataTypes => "data_types",
        };
        f.write_str(label)
    }
}

/// What happens to the load when at least one check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPolicy {
    #[default]
    Warn,
    Block,
}

impl std::str::FromStr for QualityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(QualityPolicy::Warn),
            "block" => Ok(QualityPolicy::Block),
            other => Err(format!("unknown quality policy '{}' (expected warn or block)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBound {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl RangeBound {
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }
}

/// One configured check. Thresholds left unset fall back to the project defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_rule_shape"))]
pub struct QualityRule {
    pub check: CheckKind,

    #[validate(length(min = 1, message = "Rule table cannot be empty"))]
    pub table: String,

    #[serde(default)]
    pub columns: Vec<String>,

    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub max_null_pct: Option<f64>,

    #[serde(default)]
    pub min_rows: Option<usize>,

    #[serde(default)]
    pub ranges: BTreeMap<String, RangeBound>,

    #[serde(default)]
    pub types: BTreeMap<String, ColumnKind>,
}

impl QualityRule {
    pub fn new(check: CheckKind, table: &str) -> Self {
        Self {
            check,
            table: table.to_string(),
            columns: Vec::new(),
            max_null_pct: None,
            min_rows: None,
            ranges: BTreeMap::new(),
            types: BTreeMap::new(),
        }
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_range(mut self, column: &str, bound: RangeBound) -> Self {
        self.ranges.insert(column.to_string(), bound);
        self
    }

    pub fn with_type(mut self, column: &str, kind: ColumnKind) -> Self {
        self.types.insert(column.to_string(), kind);
        self
    }
}

fn validate_rule_shape(rule: &QualityRule) -> Result<(), ValidationError> {
    let ok = match rule.check {
        CheckKind::NullValues | CheckKind::Duplicates => !rule.columns.is_empty(),
        CheckKind::ValueRanges => !rule.ranges.is_empty(),
        CheckKind::DataTypes => !rule.types.is_empty(),
        CheckKind::RowCount => true,
    };
    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("rule_shape");
        err.message = Some(format!("{} rule on '{}' names no columns", rule.check, rule.table).into());
        Err(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_from_yaml() {
        let yaml = r#"
check: value_ranges
table: fact_sales
ranges:
  quantity: { min: 0 }
  price_per_unit: { min: 0, max: 1000 }
"#;
        let rule: QualityRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.check, CheckKind::ValueRanges);
        assert_eq!(rule.ranges["price_per_unit"].max, Some(1000.0));
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_type_alias_string() {
        let yaml = "check: data_types\ntable: fact_sales\ntypes:\n  category: string\n";
        let rule: QualityRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.types["category"], ColumnKind::Text);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut rule = QualityRule::new(CheckKind::NullValues, "orders").with_columns(&["order_id"]);
        rule.max_null_pct = Some(150.0);
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_rule_without_columns_rejected() {
        let rule = QualityRule::new(CheckKind::Duplicates, "orders");
        assert!(rule.validate().is_err());
        assert!(QualityRule::new(CheckKind::RowCount, "orders").validate().is_ok());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("BLOCK".parse::<QualityPolicy>().unwrap(), QualityPolicy::Block);
        assert!("strict".parse::<QualityPolicy>().is_err());
    }
}
