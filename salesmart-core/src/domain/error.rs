// salesmart-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Key column '{column}' is missing from table '{table}'")]
    #[diagnostic(
        code(salesmart::domain::missing_key),
        help("Cleaning cannot invent a key. Check the header row of the raw extract.")
    )]
    MissingKeyColumn { table: String, column: String },

    #[error("Table '{table}' has none of the expected columns {expected:?}")]
    #[diagnostic(code(salesmart::domain::missing_columns))]
    MissingColumns { table: String, expected: Vec<String> },

    #[error("Join '{stage}' failed: column '{column}' is absent from '{table}'")]
    #[diagnostic(
        code(salesmart::domain::join),
        help("Both sides of a join need the join key column.")
    )]
    Join {
        stage: String,
        table: String,
        column: String,
    },

    #[error("Only read-only queries are allowed: {0}")]
    #[diagnostic(
        code(salesmart::domain::read_only),
        help("Submit a single SELECT (or WITH ... SELECT) statement.")
    )]
    ReadOnlyViolation(String),

    #[error("Schema Error: {0}")]
    #[diagnostic(code(salesmart::domain::schema))]
    SchemaError(String),
}
