// salesmart-core/src/ports/mod.rs

pub mod connector;
