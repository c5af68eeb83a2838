// salesmart-core/src/ports/connector.rs

// What the pipeline needs from a SQL engine, without knowing which one.

use async_trait::async_trait;

use crate::domain::table::Table;
use crate::error::EtlError;

/// Engine-independent description of a stored column.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn execute(&self, query: &str) -> Result<(), EtlError>;

    /// Runs a query and collects every row.
    async fn query(&self, query: &str) -> Result<Table, EtlError>;

    async fn query_scalar(&self, query: &str) -> Result<u64, EtlError>;

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, EtlError>;

    /// Reads a delimited file with every column kept as text.
    async fn read_source(&self, name: &str, path: &str) -> Result<Table, EtlError>;

    /// Drops and recreates `table`, then inserts all of its rows in one transaction.
    /// Returns the number of rows written.
    async fn replace_table(&self, table: &Table) -> Result<u64, EtlError>;

    /// Base tables of the main schema, sorted by name.
    async fn list_tables(&self) -> Result<Vec<String>, EtlError>;

    fn engine_name(&self) -> &str;
}
