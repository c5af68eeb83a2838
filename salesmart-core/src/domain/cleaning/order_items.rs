// salesmart-core/src/domain/cleaning/order_items.rs

use super::{CleanRun, Cleaned, Cleaner};
use crate::domain::error::DomainError;
use crate::domain::schema::order_items;
use crate::domain::table::{ColumnType, Table, Value};

const REQUIRED: [&str; 3] = [
    order_items::ORDER_ITEM_ID,
    order_items::ORDER_ID,
    order_items::PRODUCT_ID,
];

impl Cleaner {
    /// Order items need all three ids; `total_item_price` is always recomputed as
    /// `quantity * price_per_unit`.
    pub fn clean_order_items(&self, raw: &Table) -> Result<Cleaned, DomainError> {
        let _enter = self.span.enter();

        let run = CleanRun::start(raw, order_items::TABLE, &REQUIRED)?
            .warn_absent(&order_items::RAW_COLUMNS)
            .drop_missing_keys(&REQUIRED)
            .coerce_numeric(order_items::QUANTITY, 0.0)
            .coerce_numeric(order_items::PRICE_PER_UNIT, 0.0)
            .dedup(order_items::ORDER_ITEM_ID);

        let table = with_total_item_price(run.table().clone())?;

        let run = run
            .replace_table(table)
            .drop_negative(order_items::QUANTITY)
            .drop_negative(order_items::PRICE_PER_UNIT);

        Ok(run.finish())
    }
}

fn with_total_item_price(table: Table) -> Result<Table, DomainError> {
    let (Some(q), Some(p)) = (
        table.column_index(order_items::QUANTITY),
        table.column_index(order_items::PRICE_PER_UNIT),
    ) else {
        return Ok(table);
    };
    let totals = table
        .rows()
        .iter()
        .map(|row| match (row[q].as_f64(), row[p].as_f64()) {
            (Some(qty), Some(price)) => Value::Float(qty * price),
            _ => Value::Null,
        })
        .collect();
    table.set_column(order_items::TOTAL_ITEM_PRICE, ColumnType::Double, totals)
}
