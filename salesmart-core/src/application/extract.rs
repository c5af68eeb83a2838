// salesmart-core/src/application/extract.rs

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::domain::schema::{customers, order_items, orders, products};
use crate::domain::table::Table;
use crate::error::EtlError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::connector::Connector;

/// Raw extract name and the file names tried for it, in order.
pub const SOURCES: [(&str, &[&str]); 4] = [
    (orders::TABLE, &["orders.csv"]),
    (customers::TABLE, &["customers.csv"]),
    (order_items::TABLE, &["order_items.csv", "order_item.csv"]),
    (products::TABLE, &["products.csv"]),
];

/// The four raw extracts, every column as text.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub orders: Table,
    pub customers: Table,
    pub order_items: Table,
    pub products: Table,
}

pub fn locate_source(raw_dir: &Path, name: &str, candidates: &[&str]) -> Result<PathBuf, InfrastructureError> {
    candidates
        .iter()
        .map(|file| raw_dir.join(file))
        .find(|p| p.is_file())
        .ok_or_else(|| InfrastructureError::SourceNotFound {
            name: name.to_string(),
            dir: raw_dir.display().to_string(),
            candidates: candidates.join(", "),
        })
}

#[instrument(skip(connector), fields(engine = connector.engine_name()))]
pub async fn extract_all(connector: &dyn Connector, raw_dir: &Path) -> Result<RawTables, EtlError> {
    info!("Starting extraction of all data sources");
    let mut tables = Vec::with_capacity(SOURCES.len());
    for (name, candidates) in SOURCES {
        let path = locate_source(raw_dir, name, candidates)?;
        let table = connector.read_source(name, &path.to_string_lossy()).await?;
        info!(source = name, path = %path.display(), rows = table.row_count(), "Extracted");
        tables.push(table);
    }

    let mut tables = tables.into_iter();
    let mut next = || tables.next().ok_or_else(|| EtlError::InternalError("missing raw extract".into()));
    Ok(RawTables {
        orders: next()?,
        customers: next()?,
        order_items: next()?,
        products: next()?,
    })
}
