// salesmart-core/src/domain/cleaning/orders.rs

use chrono::Datelike;

use super::{CleanRun, Cleaned, Cleaner, TextCase};
use crate::domain::error::DomainError;
use crate::domain::schema::orders;
use crate::domain::table::{ColumnType, Table, Value};

impl Cleaner {
    /// Orders: key required, unknown customer/status defaults, amount coerced and non-negative,
    /// calendar parts derived from `order_date`.
    pub fn clean_orders(&self, raw: &Table) -> Result<Cleaned, DomainError> {
        let _enter = self.span.enter();

        let run = CleanRun::start(raw, orders::TABLE, &[orders::ORDER_ID])?
            .warn_absent(&orders::RAW_COLUMNS)
            .drop_missing_keys(&[orders::ORDER_ID])
            .normalize_key(orders::CUSTOMER_ID, Some(orders::UNKNOWN_CUSTOMER))
            .fill_text(orders::ORDER_STATUS, orders::UNKNOWN_STATUS)
            .coerce_numeric(orders::TOTAL_AMOUNT, 0.0)
            .parse_dates(orders::ORDER_DATE)
            .dedup(orders::ORDER_ID)
            .derive_from_date(orders::ORDER_DATE, orders::ORDER_YEAR, ColumnType::BigInt, |d| {
                Value::Int(i64::from(d.year()))
            })?
            .derive_from_date(orders::ORDER_DATE, orders::ORDER_MONTH, ColumnType::BigInt, |d| {
                Value::Int(i64::from(d.month()))
            })?
            .derive_from_date(orders::ORDER_DATE, orders::ORDER_DAY, ColumnType::BigInt, |d| {
                Value::Int(i64::from(d.day()))
            })?
            .derive_from_date(
                orders::ORDER_DATE,
                orders::ORDER_DAY_NAME,
                ColumnType::Varchar,
                |d| Value::Text(d.format("%A").to_string()),
            )?
            .normalize_text(orders::ORDER_STATUS, TextCase::Lower)
            .drop_negative(orders::TOTAL_AMOUNT);

        Ok(run.finish())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::cleaning::test_support::raw;
    use tracing::Span;

    fn raw_orders(rows: Vec<Vec<Option<&str>>>) -> Table {
        raw(
            "orders",
            &["order_id", "customer_id", "order_date", "order_status", "total_amount"],
            rows,
        )
    }

    #[test]
    fn test_clean_orders_rules() {
        let input = raw_orders(vec![
            vec![Some("1"), Some("C1"), Some("2024-01-05"), Some(" Delivered "), Some("100")],
            vec![None, Some("C2"), Some("2024-01-06"), Some("shipped"), Some("5")],
            vec![Some("2"), None, Some("garbage"), None, Some("abc")],
            vec![Some("1"), Some("C9"), Some("2024-02-01"), Some("cancelled"), Some("7")],
            vec![Some("3"), Some("C3"), Some("2024-03-01"), Some("shipped"), Some("-4")],
        ]);

        let cleaned = Cleaner::new(Span::none()).clean_orders(&input).unwrap();
        let t = &cleaned.table;

        assert_eq!(t.row_count(), 2);
        assert_eq!(cleaned.metrics.dropped_missing_key, 1);
        assert_eq!(cleaned.metrics.duplicates_removed, 1);
        assert_eq!(cleaned.metrics.dropped_out_of_range, 1);
        assert_eq!(cleaned.metrics.invalid_numeric, 1);

        assert_eq!(t.value(0, "order_status"), Some(&Value::from("delivered")));
        assert_eq!(t.value(0, "total_amount"), Some(&Value::Float(100.0)));
        assert_eq!(t.value(0, "order_year"), Some(&Value::Int(2024)));
        assert_eq!(t.value(0, "order_day_name"), Some(&Value::from("Friday")));

        // unparsable date stays null, row survives
        assert_eq!(t.value(1, "order_date"), Some(&Value::Null));
        assert_eq!(t.value(1, "order_month"), Some(&Value::Null));
        assert_eq!(t.value(1, "customer_id"), Some(&Value::from("UNKNOWN")));
        assert_eq!(t.value(1, "order_status"), Some(&Value::from("unknown")));
        assert_eq!(t.value(1, "total_amount"), Some(&Value::Float(0.0)));
    }

    #[test]
    fn test_clean_orders_is_idempotent() {
        let input = raw_orders(vec![
            vec![Some("1"), Some("C1"), Some("2024-01-05"), Some("Delivered"), Some("100")],
            vec![Some("2"), None, None, None, None],
            vec![Some("2"), Some("C2"), Some("2024-01-07"), Some("x"), Some("3")],
        ]);
        let cleaner = Cleaner::new(Span::none());
        let once = cleaner.clean_orders(&input).unwrap().table;
        let twice = cleaner.clean_orders(&once).unwrap().table;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_key_column_is_fatal() {
        let input = raw("orders", &["customer_id", "total_amount"], vec![]);
        let res = Cleaner::new(Span::none()).clean_orders(&input);
        assert!(matches!(res, Err(DomainError::MissingKeyColumn { column, .. }) if column == "order_id"));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = raw_orders(vec![vec![
            Some("1"),
            Some("C1"),
            Some("2024-01-05"),
            Some("Delivered"),
            Some("100"),
        ]]);
        let snapshot = input.clone();
        let _ = Cleaner::new(Span::none()).clean_orders(&input).unwrap();
        assert_eq!(input, snapshot);
    }
}
