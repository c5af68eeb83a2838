// salesmart-core/src/application/transform.rs

use tracing::{info, info_span};

use crate::application::extract::RawTables;
use crate::domain::cleaning::{CleanMetrics, Cleaner};
use crate::domain::error::DomainError;
use crate::domain::fact::FactAssembler;
use crate::domain::table::Table;

/// Everything the warehouse receives: the four cleaned tables and `fact_sales`.
#[derive(Debug, Clone)]
pub struct WarehouseTables {
    pub orders: Table,
    pub customers: Table,
    pub order_items: Table,
    pub products: Table,
    pub fact_sales: Table,
    pub metrics: Vec<CleanMetrics>,
}

impl WarehouseTables {
    /// Load order: cleaned entities first, then the fact table.
    pub fn all(&self) -> [&Table; 5] {
        [
            &self.orders,
            &self.customers,
            &self.order_items,
            &self.products,
            &self.fact_sales,
        ]
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.all().into_iter().find(|t| t.name() == name)
    }
}

/// Cleans every raw extract, then assembles `fact_sales`. Runs inside the caller's span.
pub fn transform_all(raw: &RawTables) -> Result<WarehouseTables, DomainError> {
    let cleaner = Cleaner::new(info_span!("clean"));
    let orders = cleaner.clean_orders(&raw.orders)?;
    let customers = cleaner.clean_customers(&raw.customers)?;
    let order_items = cleaner.clean_order_items(&raw.order_items)?;
    let products = cleaner.clean_products(&raw.products)?;

    let assembler = FactAssembler::new(info_span!("fact_sales"));
    let fact_sales = assembler.create_fact_sales(&orders.table, &order_items.table, &customers.table, &products.table)?;

    let metrics = vec![
        orders.metrics,
        customers.metrics,
        order_items.metrics,
        products.metrics,
    ];
    info!(tables = 5, "Transformation completed");

    Ok(WarehouseTables {
        orders: orders.table,
        customers: customers.table,
        order_items: order_items.table,
        products: products.table,
        fact_sales,
        metrics,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::cleaning::test_support::raw;
    use crate::domain::table::Value;

    /// The worked example: one delivered order with a single item and no email on file.
    pub(crate) fn scenario() -> RawTables {
        RawTables {
            orders: raw(
                "orders",
                &["order_id", "customer_id", "order_date", "order_status", "total_amount"],
                vec![vec![Some("1"), Some("C1"), Some("2024-01-05"), Some("Delivered"), Some("100")]],
            ),
            customers: raw(
                "customers",
                &["customer_id", "customer_name", "city", "email", "registration_date"],
                vec![vec![Some("C1"), Some("ana"), Some("jakarta"), None, Some("2023-06-01")]],
            ),
            order_items: raw(
                "order_items",
                &["order_item_id", "order_id", "product_id", "quantity", "price_per_unit"],
                vec![vec![Some("10"), Some("1"), Some("P1"), Some("2"), Some("50")]],
            ),
            products: raw(
                "products",
                &["product_id", "product_name", "category", "price", "stock"],
                vec![vec![Some("P1"), Some("widget"), Some("tools"), Some("50"), Some("7")]],
            ),
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let tables = transform_all(&scenario()).unwrap();
        let fact = &tables.fact_sales;
        assert_eq!(fact.row_count(), 1);

        let get = |col: &str| fact.value(0, col).cloned().unwrap();
        assert_eq!(get("order_status"), Value::from("delivered"));
        assert_eq!(get("customer_name"), Value::from("Ana"));
        assert_eq!(get("city"), Value::from("Jakarta"));
        assert_eq!(get("product_name"), Value::from("Widget"));
        assert_eq!(get("category"), Value::from("Tools"));
        assert_eq!(get("total_item_price"), Value::Float(100.0));
        assert_eq!(get("order_day_name"), Value::from("Friday"));

        assert_eq!(
            tables.customers.value(0, "email"),
            Some(&Value::from("no-email@unknown.com"))
        );
        assert!(!fact.has_column("email"));
    }

    #[test]
    fn test_tables_in_load_order() {
        let tables = transform_all(&scenario()).unwrap();
        let names: Vec<_> = tables.all().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["orders", "customers", "order_items", "products", "fact_sales"]);
        assert!(tables.get("fact_sales").is_some());
        assert!(tables.get("ghost").is_none());
        assert_eq!(tables.metrics.len(), 4);
    }

    #[test]
    fn test_missing_key_column_aborts() {
        let mut raw_tables = scenario();
        raw_tables.orders = raw_tables.orders.select(&["customer_id", "order_date"]);
        let err = transform_all(&raw_tables).unwrap_err();
        assert!(matches!(err, DomainError::MissingKeyColumn { .. }));
    }
}
