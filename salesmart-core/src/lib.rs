// salesmart-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL LAYOUT ---

// 1. Ports (traits the application needs from the outside world)
pub mod ports;

// 2. Domain (tables, cleaning rules, fact assembly, quality checks)
// Depends on nothing but itself.
pub mod domain;

// 3. Infrastructure (DuckDB adapter, config files, filesystem)
pub mod infrastructure;

// 4. Application (extract, transform, warehouse, pipeline orchestration)
pub mod application;

// --- GLOBAL ERROR ---
pub mod error;

// --- RE-EXPORTS ---
pub use error::EtlError;
