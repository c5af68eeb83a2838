// salesmart-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    // --- DOMAIN (cleaning, joins, query guard) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE (database, IO, config) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

impl From<std::io::Error> for EtlError {
    fn from(err: std::io::Error) -> Self {
        EtlError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for EtlError {
    fn from(err: duckdb::Error) -> Self {
        EtlError::Infrastructure(InfrastructureError::from(err))
    }
}
