// salesmart/src/commands/query.rs
//
// USE CASE: Run a read-only SQL query against the warehouse.

use salesmart_core::application::WarehouseStore;

use super::{open_warehouse, render};

pub async fn execute(query: String, db_path: String) -> anyhow::Result<()> {
    let connector = open_warehouse(&db_path)?;
    let store = WarehouseStore::new(&connector, tracing::info_span!("query"));

    let result = store.execute_query(&query).await?;
    println!("{}", render(&result));
    println!("({} rows)", result.row_count());
    Ok(())
}
