// salesmart/src/commands/mod.rs

pub mod clean;
pub mod info;
pub mod inspect;
pub mod query;
pub mod run;

use std::path::Path;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table as Grid};
use salesmart_core::domain::table::Table;
use salesmart_core::infrastructure::adapters::duckdb::DuckDBConnector;

/// Opens an existing warehouse file without write access.
pub(crate) fn open_warehouse(db_path: &str) -> anyhow::Result<DuckDBConnector> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "❌ Database not found at: {}\n👉 Have you run 'salesmart run'?",
            db_path
        );
    }
    let connector = DuckDBConnector::open_read_only(db_path)?;
    Ok(connector)
}

pub(crate) fn render(table: &Table) -> Grid {
    let mut grid = Grid::new();
    grid.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(table.column_names());
    for row in table.rows() {
        grid.add_row(row.iter().map(|v| v.to_string()));
    }
    grid
}
