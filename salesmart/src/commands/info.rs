// salesmart/src/commands/info.rs

use comfy_table::Table as Grid;
use comfy_table::presets::UTF8_FULL;
use salesmart_core::application::WarehouseStore;

use super::open_warehouse;

pub async fn execute(db_path: String) -> anyhow::Result<()> {
    let connector = open_warehouse(&db_path)?;
    let store = WarehouseStore::new(&connector, tracing::info_span!("info"));

    let info = store.get_table_info().await?;
    if info.is_empty() {
        println!("📭 Warehouse at {} has no tables.", db_path);
        return Ok(());
    }

    let mut grid = Grid::new();
    grid.load_preset(UTF8_FULL).set_header(vec!["table", "rows"]);
    for (table, count) in &info {
        grid.add_row(vec![table.clone(), count.to_string()]);
    }
    println!("📊 Warehouse: {}", db_path);
    println!("{}", grid);
    Ok(())
}
