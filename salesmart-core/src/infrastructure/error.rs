// salesmart-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(salesmart::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("DuckDB connection handle poisoned")]
    #[diagnostic(code(salesmart::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(salesmart::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(salesmart::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(salesmart::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(salesmart::infra::config_missing))]
    ConfigNotFound(String),

    // --- EXTRACTION ---
    #[error("Raw extract '{name}' not found in {dir}")]
    #[diagnostic(
        code(salesmart::infra::source_missing),
        help("Expected one of: {candidates}")
    )]
    SourceNotFound {
        name: String,
        dir: String,
        candidates: String,
    },

    // --- SQL SAFETY ---
    #[error("Invalid table identifier: '{0}'")]
    #[diagnostic(
        code(salesmart::infra::identifier),
        help("Table names must match [A-Za-z_][A-Za-z0-9_]*")
    )]
    InvalidIdentifier(String),
}

impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
