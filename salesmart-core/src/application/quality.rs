// salesmart-core/src/application/quality.rs

use tracing::{info, info_span, warn};

use crate::application::transform::WarehouseTables;
use crate::domain::project::QualityConfig;
use crate::domain::quality::{CheckKind, QualityGate, QualityReport, QualityRule, RangeBound};
use crate::domain::schema::{customers, fact_sales, order_items, orders, products};
use crate::domain::table::ColumnKind;

/// Checks run when the project configures none.
pub fn default_suite() -> Vec<QualityRule> {
    vec![
        QualityRule::new(CheckKind::NullValues, orders::TABLE).with_columns(&[orders::ORDER_ID, orders::CUSTOMER_ID]),
        QualityRule::new(CheckKind::Duplicates, orders::TABLE).with_columns(&[orders::ORDER_ID]),
        QualityRule::new(CheckKind::RowCount, orders::TABLE),
        QualityRule::new(CheckKind::NullValues, customers::TABLE).with_columns(&[customers::CUSTOMER_ID]),
        QualityRule::new(CheckKind::Duplicates, customers::TABLE).with_columns(&[customers::CUSTOMER_ID]),
        QualityRule::new(CheckKind::Duplicates, order_items::TABLE).with_columns(&[order_items::ORDER_ITEM_ID]),
        QualityRule::new(CheckKind::Duplicates, products::TABLE).with_columns(&[products::PRODUCT_ID]),
        QualityRule::new(CheckKind::ValueRanges, fact_sales::TABLE)
            .with_range(order_items::QUANTITY, RangeBound::at_least(0.0))
            .with_range(order_items::PRICE_PER_UNIT, RangeBound::at_least(0.0)),
        QualityRule::new(CheckKind::RowCount, fact_sales::TABLE),
        QualityRule::new(CheckKind::DataTypes, fact_sales::TABLE)
            .with_type(order_items::QUANTITY, ColumnKind::Numeric)
            .with_type(orders::ORDER_DATE, ColumnKind::Datetime)
            .with_type(products::CATEGORY, ColumnKind::Text),
    ]
}

pub fn run_quality_checks(tables: &WarehouseTables, config: &QualityConfig) -> QualityReport {
    let defaults = config.defaults();
    let suite;
    let rules = if config.checks.is_empty() {
        suite = default_suite();
        &suite
    } else {
        &config.checks
    };

    let mut gate = QualityGate::new(info_span!("quality"));
    for rule in rules {
        gate.apply_rule(rule, tables.get(&rule.table), &defaults);
    }

    let report = gate.generate_report();
    info!(
        passed = report.passed,
        total = report.total_checks,
        "Quality checks completed"
    );
    if report.failed > 0 {
        warn!(failed = report.failed, "Quality checks failed");
    }
    report
}
