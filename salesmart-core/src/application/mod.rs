// salesmart-core/src/application/mod.rs

pub mod clean;
pub mod extract;
pub mod pipeline;
pub mod quality;
pub mod transform;
pub mod warehouse;

// --- RE-EXPORTS (FACADE) ---
// `use salesmart_core::application::{run_pipeline, clean_project, WarehouseStore};`

pub use clean::clean_project;
pub use extract::{RawTables, extract_all};
pub use pipeline::{RunResult, run_pipeline};
pub use quality::{default_suite, run_quality_checks};
pub use transform::{WarehouseTables, transform_all};
pub use warehouse::WarehouseStore;
