// salesmart/src/commands/inspect.rs
//
// USE CASE: Inspect a warehouse table (schema + sample rows).

use comfy_table::Table as Grid;
use comfy_table::presets::UTF8_FULL;
use salesmart_core::infrastructure::sql::quote_identifier;
use salesmart_core::ports::connector::Connector;

use super::{open_warehouse, render};

pub async fn execute(db_path: String, table: String, limit: usize) -> anyhow::Result<()> {
    let connector = open_warehouse(&db_path)?;

    if !connector.list_tables().await?.contains(&table) {
        anyhow::bail!("Table '{}' not found in {}", table, db_path);
    }

    println!("\n🔍 Inspecting Table: '{}'", table);

    let columns = connector.fetch_columns(&table).await?;
    let mut schema = Grid::new();
    schema
        .load_preset(UTF8_FULL)
        .set_header(vec!["column", "type", "nullable"]);
    for col in &columns {
        schema.add_row(vec![
            col.name.clone(),
            col.data_type.clone(),
            col.is_nullable.to_string(),
        ]);
    }
    println!("{}", schema);

    println!("   --- Rows (Limit {}) ---", limit);
    let sql = format!("SELECT * FROM {} LIMIT {}", quote_identifier(&table)?, limit);
    let sample = connector.query(&sql).await?;
    println!("{}", render(&sample));

    Ok(())
}
