// salesmart-core/src/application/warehouse.rs

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{Instrument, Span, debug, error, info, warn};

use crate::domain::query::ensure_read_only;
use crate::domain::schema::fact_sales;
use crate::domain::table::Table;
use crate::error::EtlError;
use crate::infrastructure::sql::quote_identifier;
use crate::ports::connector::Connector;

/// Persistence side of the pipeline: replace-loads, indexes, introspection and
/// read-only querying, all through the [`Connector`] port.
pub struct WarehouseStore<'a> {
    connector: &'a dyn Connector,
    span: Span,
}

impl<'a> WarehouseStore<'a> {
    pub fn new(connector: &'a dyn Connector, span: Span) -> Self {
        Self { connector, span }
    }

    /// Drops and recreates every table, one transaction per table.
    /// Returns rows written per table.
    pub async fn load_all(&self, tables: &[&Table]) -> Result<BTreeMap<String, u64>, EtlError> {
        async {
            info!(tables = tables.len(), "Starting to load all data to warehouse");
            let mut written = BTreeMap::new();
            for table in tables {
                quote_identifier(table.name())?;
                let rows = self.connector.replace_table(table).await?;
                info!(table = table.name(), rows, "Loaded");
                written.insert(table.name().to_string(), rows);
            }
            Ok::<_, EtlError>(written)
        }
        .instrument(self.span.clone())
        .await
    }

    /// `CREATE INDEX IF NOT EXISTS` on the fact table's filter columns that exist.
    pub async fn create_indexes(&self) -> Result<Vec<String>, EtlError> {
        async {
            let tables = self.connector.list_tables().await?;
            if !tables.iter().any(|t| t == fact_sales::TABLE) {
                warn!("fact_sales is not in the warehouse, no indexes created");
                return Ok(Vec::new());
            }

            let present: Vec<String> = self
                .connector
                .fetch_columns(fact_sales::TABLE)
                .await?
                .into_iter()
                .map(|c| c.name)
                .collect();

            let table = quote_identifier(fact_sales::TABLE)?;
            let mut created = Vec::new();
            for col in fact_sales::INDEXED_COLUMNS {
                if !present.iter().any(|p| p == col) {
                    debug!(column = col, "Skipping index on absent column");
                    continue;
                }
                let index = format!("idx_{}_{}", fact_sales::TABLE, col);
                let sql = format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                    quote_identifier(&index)?,
                    table,
                    quote_identifier(col)?
                );
                self.connector.execute(&sql).await?;
                created.push(index);
            }
            info!(indexes = ?created, "Indexes created");
            Ok::<_, EtlError>(created)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Row count per persisted table, sorted by table name.
    pub async fn get_table_info(&self) -> Result<BTreeMap<String, u64>, EtlError> {
        async {
            let mut info = BTreeMap::new();
            for name in self.connector.list_tables().await? {
                let sql = format!("SELECT count(*) FROM {}", quote_identifier(&name)?);
                let count = self.connector.query_scalar(&sql).await?;
                info.insert(name, count);
            }
            Ok::<_, EtlError>(info)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Runs one read-only statement and returns its rows.
    pub async fn execute_query(&self, query: &str) -> Result<Table, EtlError> {
        async {
            ensure_read_only(query).map_err(EtlError::Domain)?;
            let start = Instant::now();
            debug!("Executing query: {}", query);

            match self.connector.query(query).await {
                Ok(table) => {
                    debug!(rows = table.row_count(), "Query finished in {:.2?}", start.elapsed());
                    Ok(table)
                }
                Err(e) => {
                    error!("Query failed after {:.2?}: {}", start.elapsed(), e);
                    Err(e)
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::test_support::MockConnector;
    use crate::domain::error::DomainError;
    use crate::domain::table::{Column, ColumnType, Value};
    use crate::infrastructure::adapters::duckdb::DuckDBConnector;
    use crate::infrastructure::error::InfrastructureError;
    use anyhow::Result;

    fn table(name: &str, columns: &[&str], rows: usize) -> Table {
        let cols = columns.iter().map(|c| Column::new(*c, ColumnType::Varchar)).collect();
        let data = (0..rows)
            .map(|i| columns.iter().map(|_| Value::from(i.to_string())).collect())
            .collect();
        Table::with_rows(name, cols, data).unwrap()
    }

    fn fact(rows: usize) -> Table {
        table("fact_sales", &["order_id", "order_date", "customer_id", "category"], rows)
    }

    #[tokio::test]
    async fn test_indexes_only_for_present_columns() -> Result<()> {
        let connector = MockConnector::new();
        let store = WarehouseStore::new(&connector, Span::none());
        store.load_all(&[&fact(2)]).await?;

        let created = store.create_indexes().await?;
        assert_eq!(
            created,
            vec![
                "idx_fact_sales_order_date",
                "idx_fact_sales_customer_id",
                "idx_fact_sales_category"
            ]
        );

        let queries = connector.queries();
        let index_sql: Vec<_> = queries.iter().filter(|q| q.starts_with("CREATE INDEX")).collect();
        assert_eq!(index_sql.len(), 3);
        assert_eq!(
            index_sql[0],
            "CREATE INDEX IF NOT EXISTS \"idx_fact_sales_order_date\" ON \"fact_sales\" (\"order_date\")"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_no_fact_table_no_indexes() -> Result<()> {
        let connector = MockConnector::new();
        let store = WarehouseStore::new(&connector, Span::none());
        assert!(store.create_indexes().await?.is_empty());
        assert!(connector.queries().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_table_info_sorted_by_name() -> Result<()> {
        let connector = MockConnector::new();
        let store = WarehouseStore::new(&connector, Span::none());
        store
            .load_all(&[&table("products", &["product_id"], 3), &fact(4), &table("orders", &["order_id"], 1)])
            .await?;

        let info = store.get_table_info().await?;
        let entries: Vec<_> = info.into_iter().collect();
        assert_eq!(
            entries,
            vec![
                ("fact_sales".to_string(), 4),
                ("orders".to_string(), 1),
                ("products".to_string(), 3)
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_load_rejects_unsafe_table_name() -> Result<()> {
        let connector = MockConnector::new();
        let store = WarehouseStore::new(&connector, Span::none());
        let err = store.load_all(&[&table("orders;--", &["a"], 1)]).await.unwrap_err();
        assert!(matches!(
            err,
            EtlError::Infrastructure(InfrastructureError::InvalidIdentifier(_))
        ));
        assert!(connector.queries().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_query_must_be_read_only() -> Result<()> {
        let connector = MockConnector::new();
        let store = WarehouseStore::new(&connector, Span::none());
        let err = store.execute_query("DROP TABLE orders").await.unwrap_err();
        assert!(matches!(err, EtlError::Domain(DomainError::ReadOnlyViolation(_))));
        assert!(connector.queries().is_empty());

        store.execute_query("SELECT 42 AS answer").await?;
        assert_eq!(connector.queries(), vec!["SELECT 42 AS answer".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_semantics_on_duckdb() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        let store = WarehouseStore::new(&connector, Span::none());

        store.load_all(&[&fact(5)]).await?;
        store.create_indexes().await?;
        store.load_all(&[&fact(3)]).await?;
        store.create_indexes().await?;

        let info = store.get_table_info().await?;
        assert_eq!(info.get("fact_sales"), Some(&3));

        let result = store
            .execute_query("SELECT count(DISTINCT order_id) AS n FROM fact_sales")
            .await?;
        assert_eq!(result.value(0, "n"), Some(&Value::Int(3)));
        Ok(())
    }
}
