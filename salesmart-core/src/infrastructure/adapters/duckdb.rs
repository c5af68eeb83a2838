// salesmart-core/src/infrastructure/adapters/duckdb.rs

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use duckdb::types::{TimeUnit, Value as DuckValue, ValueRef};
use duckdb::{AccessMode, Config, Connection, params_from_iter};
use tracing::{debug, instrument};

use crate::domain::table::{Column, ColumnType, Table, Value};
use crate::error::EtlError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::infrastructure::sql::{quote_identifier, quote_literal};
use crate::ports::connector::{ColumnSchema, Connector};

/// DuckDB-backed connector. The root handle is never used directly: every
/// operation works on its own cloned connection, released when it returns.
pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        Self::open(db_path, Config::default())
    }

    pub fn open_read_only(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        Self::open(db_path, config)
    }

    fn open(db_path: &str, config: Config) -> Result<Self, InfrastructureError> {
        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn acquire(&self) -> Result<Connection, InfrastructureError> {
        let root = self
            .conn
            .lock()
            .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned))?;
        Ok(root.try_clone()?)
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<(), EtlError> {
        let conn = self.acquire()?;
        conn.execute_batch(query)?;
        Ok(())
    }

    async fn query(&self, query: &str) -> Result<Table, EtlError> {
        let conn = self.acquire()?;
        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([])?;
        let names: Vec<String> = rows.as_ref().map(|s| s.column_names()).unwrap_or_default();

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(names.len());
            for i in 0..names.len() {
                record.push(from_duckdb(row.get_ref(i)?));
            }
            records.push(record);
        }

        let columns = names
            .iter()
            .enumerate()
            .map(|(i, name)| Column::new(name.as_str(), infer_type(&records, i)))
            .collect();
        Ok(Table::with_rows("query", columns, records)?)
    }

    async fn query_scalar(&self, query: &str) -> Result<u64, EtlError> {
        let conn = self.acquire()?;
        let value: i64 = conn.query_row(query, [], |row| row.get(0))?;
        u64::try_from(value).map_err(|_| EtlError::InternalError(format!("negative scalar {} from: {}", value, query)))
    }

    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, EtlError> {
        let conn = self.acquire()?;
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table_name)?))?;
        let rows = stmt.query_map([], |row| {
            Ok(ColumnSchema {
                name: row.get("name")?,
                data_type: row.get("type")?,
                is_nullable: !row.get::<_, bool>("notnull")?,
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    #[instrument(skip(self))]
    async fn read_source(&self, name: &str, path: &str) -> Result<Table, EtlError> {
        let query = format!(
            "SELECT * FROM read_csv_auto({}, header = true, all_varchar = true)",
            quote_literal(path)
        );
        let table = self.query(&query).await?;
        let columns = table
            .columns()
            .iter()
            .map(|c| Column::new(c.name.as_str(), ColumnType::Varchar))
            .collect();
        Ok(Table::with_rows(name, columns, table.rows().to_vec())?)
    }

    #[instrument(skip(self, table), fields(table = table.name(), rows = table.row_count()))]
    async fn replace_table(&self, table: &Table) -> Result<u64, EtlError> {
        let name = quote_identifier(table.name())?;
        if table.columns().is_empty() {
            return Err(EtlError::InternalError(format!(
                "cannot persist '{}' without columns",
                table.name()
            )));
        }
        let mut ddl_columns = Vec::with_capacity(table.columns().len());
        for col in table.columns() {
            ddl_columns.push(format!("{} {}", quote_identifier(&col.name)?, col.data_type.sql_type()));
        }
        let placeholders = vec!["?"; table.columns().len()].join(", ");

        let mut conn = self.acquire()?;
        let tx = conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {name}; CREATE TABLE {name} ({});",
            ddl_columns.join(", ")
        ))?;
        let mut written = 0u64;
        {
            let mut stmt = tx.prepare(&format!("INSERT INTO {} VALUES ({})", name, placeholders))?;
            for row in table.rows() {
                stmt.execute(params_from_iter(row.iter().map(to_duckdb)))?;
                written += 1;
            }
        }
        tx.commit()?;
        debug!(written, "Table replaced");
        Ok(written)
    }

    async fn list_tables(&self) -> Result<Vec<String>, EtlError> {
        let conn = self.acquire()?;
        let mut stmt = conn.prepare(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'main' AND table_type = 'BASE TABLE' \
             ORDER BY table_name",
        )?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut tables = Vec::new();
        for name in names {
            tables.push(name?);
        }
        Ok(tables)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

fn to_duckdb(value: &Value) -> DuckValue {
    match value {
        Value::Null => DuckValue::Null,
        Value::Int(i) => DuckValue::BigInt(*i),
        Value::Float(f) => DuckValue::Double(*f),
        Value::Text(s) => DuckValue::Text(s.clone()),
        // DuckDB casts the literal into the TIMESTAMP column.
        Value::Timestamp(ts) => DuckValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
    }
}

fn from_duckdb(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Text(b.to_string()),
        ValueRef::TinyInt(i) => Value::Int(i64::from(i)),
        ValueRef::SmallInt(i) => Value::Int(i64::from(i)),
        ValueRef::Int(i) => Value::Int(i64::from(i)),
        ValueRef::BigInt(i) => Value::Int(i),
        ValueRef::UTinyInt(i) => Value::Int(i64::from(i)),
        ValueRef::USmallInt(i) => Value::Int(i64::from(i)),
        ValueRef::UInt(i) => Value::Int(i64::from(i)),
        ValueRef::UBigInt(i) => i64::try_from(i).map(Value::Int).unwrap_or(Value::Float(i as f64)),
        ValueRef::HugeInt(i) => i64::try_from(i).map(Value::Int).unwrap_or(Value::Float(i as f64)),
        ValueRef::Float(f) => Value::Float(f64::from(f)),
        ValueRef::Double(f) => Value::Float(f),
        ValueRef::Decimal(d) => d.to_string().parse::<f64>().map(Value::Float).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Timestamp(unit, raw) => timestamp_from(unit, raw).map(Value::Timestamp).unwrap_or(Value::Null),
        ValueRef::Date32(days) => NaiveDate::from_num_days_from_ce_opt(days + 719_163)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Value::Timestamp)
            .unwrap_or(Value::Null),
        other => Value::Text(format!("{:?}", other)),
    }
}

fn timestamp_from(unit: TimeUnit, raw: i64) -> Option<NaiveDateTime> {
    let micros = match unit {
        TimeUnit::Second => raw.checked_mul(1_000_000)?,
        TimeUnit::Millisecond => raw.checked_mul(1_000)?,
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    };
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}

/// Type of the first non-null value in a result column; text when all are null.
fn infer_type(records: &[Vec<Value>], idx: usize) -> ColumnType {
    records
        .iter()
        .find_map(|r| match &r[idx] {
            Value::Null => None,
            Value::Int(_) => Some(ColumnType::BigInt),
            Value::Float(_) => Some(ColumnType::Double),
            Value::Timestamp(_) => Some(ColumnType::Timestamp),
            Value::Text(_) => Some(ColumnType::Varchar),
        })
        .unwrap_or(ColumnType::Varchar)
}
