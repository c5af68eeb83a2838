// salesmart-core/src/domain/fact.rs

//! Assembly of the denormalized `fact_sales` table.
//!
//! The join plan is resolved once, up front, from the columns the four cleaned
//! tables actually carry ([`FactSchema::resolve`]). Row processing then follows
//! that plan without re-checking column presence.

use std::collections::HashMap;

use tracing::{Span, debug, info};

use crate::domain::error::DomainError;
use crate::domain::schema::{customers, fact_sales, order_items, orders, products};
use crate::domain::table::{Column, Table, Value};

/// One left join of the assembly: the right-hand table projected onto `projection`,
/// matched on `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinStage {
    pub name: &'static str,
    pub right_table: String,
    pub key: &'static str,
    pub projection: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactSchema {
    pub stages: Vec<JoinStage>,
    pub output_columns: Vec<String>,
}

impl FactSchema {
    pub fn resolve(
        orders: &Table,
        order_items: &Table,
        customers: &Table,
        products: &Table,
    ) -> Result<Self, DomainError> {
        let mut available: Vec<String> = orders.column_names().iter().map(|c| c.to_string()).collect();

        let customer_projection = present(customers, &fact_sales::CUSTOMER_PROJECTION);
        if customer_projection.is_empty() {
            return Err(DomainError::MissingColumns {
                table: customers.name().to_string(),
                expected: fact_sales::CUSTOMER_PROJECTION.iter().map(|c| c.to_string()).collect(),
            });
        }

        let plan = [
            ("customers", customers, customers::CUSTOMER_ID, customer_projection),
            (
                "order_items",
                order_items,
                order_items::ORDER_ID,
                present(order_items, &fact_sales::ITEM_PROJECTION),
            ),
            (
                "products",
                products,
                products::PRODUCT_ID,
                present(products, &fact_sales::PRODUCT_PROJECTION),
            ),
        ];

        let mut stages = Vec::with_capacity(plan.len());
        for (name, right, key, projection) in plan {
            if !available.iter().any(|c| c == key) {
                return Err(DomainError::Join {
                    stage: name.to_string(),
                    table: orders.name().to_string(),
                    column: key.to_string(),
                });
            }
            if !projection.iter().any(|c| c == key) {
                return Err(DomainError::Join {
                    stage: name.to_string(),
                    table: right.name().to_string(),
                    column: key.to_string(),
                });
            }
            for col in &projection {
                if !available.contains(col) {
                    available.push(col.clone());
                }
            }
            stages.push(JoinStage {
                name,
                right_table: right.name().to_string(),
                key,
                projection,
            });
        }

        let output_columns = fact_sales::OUTPUT_COLUMNS
            .iter()
            .filter(|c| available.iter().any(|a| a == *c))
            .map(|c| c.to_string())
            .collect();

        Ok(Self {
            stages,
            output_columns,
        })
    }
}

fn present(table: &Table, wanted: &[&str]) -> Vec<String> {
    wanted
        .iter()
        .filter(|c| table.has_column(c))
        .map(|c| c.to_string())
        .collect()
}

pub struct FactAssembler {
    span: Span,
}

impl FactAssembler {
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    pub fn create_fact_sales(
        &self,
        orders: &Table,
        order_items: &Table,
        customers: &Table,
        products: &Table,
    ) -> Result<Table, DomainError> {
        let _enter = self.span.enter();
        info!("Creating fact_sales table...");
        debug!(columns = ?orders.column_names(), "orders columns");
        debug!(columns = ?order_items.column_names(), "order_items columns");
        debug!(columns = ?customers.column_names(), "customers columns");
        debug!(columns = ?products.column_names(), "products columns");

        let schema = FactSchema::resolve(orders, order_items, customers, products)?;

        let rights = [customers, order_items, products];
        let mut fact = orders.clone().renamed(fact_sales::TABLE);
        for (stage, right) in schema.stages.iter().zip(rights) {
            fact = left_join(&fact, &right.select(&stage.projection), stage.key)?;
            info!(stage = stage.name, rows = fact.row_count(), "Joined");
        }

        info!(columns = ?schema.output_columns, "Final columns selected");
        let fact = fact.select(&schema.output_columns);
        info!(
            rows = fact.row_count(),
            columns = fact.columns().len(),
            "Fact sales table created"
        );
        Ok(fact)
    }
}

/// Left join on `key`. Every left row appears at least once; a left row with N
/// matches appears N times. Null keys never match. Right columns that already
/// exist on the left are dropped.
pub fn left_join(left: &Table, right: &Table, key: &str) -> Result<Table, DomainError> {
    let missing = |t: &Table| DomainError::Join {
        stage: format!("{} -> {}", left.name(), right.name()),
        table: t.name().to_string(),
        column: key.to_string(),
    };
    let left_key = left.column_index(key).ok_or_else(|| missing(left))?;
    let right_key = right.column_index(key).ok_or_else(|| missing(right))?;

    let carried: Vec<usize> = (0..right.columns().len())
        .filter(|&i| i != right_key && !left.has_column(&right.columns()[i].name))
        .collect();

    let mut index: HashMap<String, Vec<usize>> = HashMap::new();
    for (pos, row) in right.rows().iter().enumerate() {
        if let Some(k) = row[right_key].as_key() {
            index.entry(k).or_default().push(pos);
        }
    }

    let mut columns: Vec<Column> = left.columns().to_vec();
    columns.extend(carried.iter().map(|&i| right.columns()[i].clone()));

    let mut rows = Vec::with_capacity(left.row_count());
    for row in left.rows() {
        let matches = row[left_key].as_key().and_then(|k| index.get(&k));
        match matches {
            Some(positions) => {
                for &pos in positions {
                    let r = &right.rows()[pos];
                    let mut joined = row.clone();
                    joined.extend(carried.iter().map(|&i| r[i].clone()));
                    rows.push(joined);
                }
            }
            None => {
                let mut joined = row.clone();
                joined.extend(std::iter::repeat_n(Value::Null, carried.len()));
                rows.push(joined);
            }
        }
    }

    Table::with_rows(left.name(), columns, rows)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::cleaning::Cleaner;
    use crate::domain::cleaning::test_support::raw;

    struct Fixture {
        orders: Table,
        items: Table,
        customers: Table,
        products: Table,
    }

    fn fixture() -> Fixture {
        let cleaner = Cleaner::new(Span::none());
        let orders = raw(
            "orders",
            &["order_id", "customer_id", "order_date", "order_status", "total_amount"],
            vec![
                vec![Some("1"), Some("C1"), Some("2024-01-05"), Some("delivered"), Some("100")],
                vec![Some("2"), Some("C2"), Some("2024-01-06"), Some("shipped"), Some("30")],
                vec![Some("3"), Some("C9"), Some("2024-01-07"), Some("pending"), Some("0")],
            ],
        );
        let items = raw(
            "order_items",
            &["order_item_id", "order_id", "product_id", "quantity", "price_per_unit"],
            vec![
                vec![Some("1"), Some("1"), Some("P1"), Some("2"), Some("50")],
                vec![Some("2"), Some("2"), Some("P1"), Some("1"), Some("10")],
                vec![Some("3"), Some("2"), Some("P2"), Some("4"), Some("5")],
                vec![Some("4"), Some("99"), Some("P2"), Some("1"), Some("5")],
            ],
        );
        let customers = raw(
            "customers",
            &["customer_id", "customer_name", "city", "email", "registration_date"],
            vec![
                vec![Some("C1"), Some("ana"), Some("jakarta"), None, Some("2023-01-01")],
                vec![Some("C2"), Some("budi"), Some("bandung"), None, Some("2023-02-01")],
            ],
        );
        let products = raw(
            "products",
            &["product_id", "product_name", "category", "price", "stock"],
            vec![
                vec![Some("P1"), Some("widget"), Some("tools"), Some("50"), Some("10")],
                vec![Some("P2"), Some("gadget"), Some("toys"), Some("5"), Some("3")],
            ],
        );
        Fixture {
            orders: cleaner.clean_orders(&orders).unwrap().table,
            items: cleaner.clean_order_items(&items).unwrap().table,
            customers: cleaner.clean_customers(&customers).unwrap().table,
            products: cleaner.clean_products(&products).unwrap().table,
        }
    }

    fn assemble(f: &Fixture) -> Result<Table, DomainError> {
        FactAssembler::new(Span::none()).create_fact_sales(&f.orders, &f.items, &f.customers, &f.products)
    }

    #[test]
    fn test_fan_out_law() {
        let f = fixture();
        let fact = assemble(&f).unwrap();

        // order 1 -> 1 item, order 2 -> 2 items, order 3 -> none (one null row)
        let expected: usize = f
            .orders
            .column_values("order_id")
            .unwrap()
            .map(|id| {
                let n = f
                    .items
                    .column_values("order_id")
                    .unwrap()
                    .filter(|v| *v == id)
                    .count();
                n.max(1)
            })
            .sum();
        assert_eq!(expected, 4);
        assert_eq!(fact.row_count(), expected);
    }

    #[test]
    fn test_order_without_items_keeps_null_item_fields() {
        let fact = assemble(&fixture()).unwrap();
        let row = (0..fact.row_count())
            .find(|&r| fact.value(r, "order_id") == Some(&Value::from("3")))
            .unwrap();
        assert_eq!(fact.value(row, "product_id"), Some(&Value::Null));
        assert_eq!(fact.value(row, "quantity"), Some(&Value::Null));
        assert_eq!(fact.value(row, "product_name"), Some(&Value::Null));
        // unknown customer C9 has no name either
        assert_eq!(fact.value(row, "customer_name"), Some(&Value::Null));
    }

    #[test]
    fn test_output_column_order() {
        let fact = assemble(&fixture()).unwrap();
        assert_eq!(fact.name(), "fact_sales");
        assert_eq!(fact.column_names(), fact_sales::OUTPUT_COLUMNS.to_vec());
    }

    #[test]
    fn test_fact_arithmetic_invariant() {
        let fact = assemble(&fixture()).unwrap();
        for r in 0..fact.row_count() {
            let q = fact.value(r, "quantity").and_then(Value::as_f64);
            let p = fact.value(r, "price_per_unit").and_then(Value::as_f64);
            let t = fact.value(r, "total_item_price").and_then(Value::as_f64);
            if let (Some(q), Some(p), Some(t)) = (q, p, t) {
                assert_eq!(t, q * p);
            }
        }
    }

    #[test]
    fn test_missing_customer_columns_is_fatal() {
        let f = fixture();
        let customers = f.customers.select(&["email"]);
        let res = FactAssembler::new(Span::none()).create_fact_sales(&f.orders, &f.items, &customers, &f.products);
        assert!(matches!(res, Err(DomainError::MissingColumns { .. })));
    }

    #[test]
    fn test_missing_join_key_is_join_error() {
        let f = fixture();
        let items = f.items.select(&["order_item_id", "product_id", "quantity"]);
        let res = FactAssembler::new(Span::none()).create_fact_sales(&f.orders, &items, &f.customers, &f.products);
        assert!(matches!(res, Err(DomainError::Join { column, .. }) if column == "order_id"));
    }

    #[test]
    fn test_absent_optional_columns_are_omitted() {
        let f = fixture();
        let products = f.products.select(&["product_id", "product_name"]);
        let customers = f.customers.select(&["customer_id", "city"]);
        let fact = FactAssembler::new(Span::none())
            .create_fact_sales(&f.orders, &f.items, &customers, &products)
            .unwrap();
        assert!(!fact.has_column("category"));
        assert!(!fact.has_column("customer_name"));
        assert!(fact.has_column("product_name"));
        assert_eq!(fact.row_count(), 4);
    }

    #[test]
    fn test_resolve_reports_stages() {
        let f = fixture();
        let schema = FactSchema::resolve(&f.orders, &f.items, &f.customers, &f.products).unwrap();
        let names: Vec<_> = schema.stages.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["customers", "order_items", "products"]);
        assert_eq!(schema.stages[1].key, "order_id");
    }

    #[test]
    fn test_left_join_null_keys_never_match() {
        let left = raw("l", &["k", "a"], vec![vec![None, Some("x")]]);
        let right = raw("r", &["k", "b"], vec![vec![None, Some("y")]]);
        let joined = left_join(&left, &right, "k").unwrap();
        assert_eq!(joined.row_count(), 1);
        assert_eq!(joined.value(0, "b"), Some(&Value::Null));
    }
}
