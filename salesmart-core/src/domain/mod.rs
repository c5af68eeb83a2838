// salesmart-core/src/domain/mod.rs

pub mod cleaning;
pub mod error;
pub mod fact;
pub mod project;
pub mod quality;
pub mod query;
pub mod schema;
pub mod table;

pub use cleaning::{CleanMetrics, Cleaned, Cleaner};
pub use fact::{FactAssembler, FactSchema};
pub use quality::{QualityGate, QualityPolicy, QualityReport, QualityRule};
pub use table::{Column, ColumnKind, ColumnType, Table, Value};
