//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use crate::value::{DbValue, QueryOutput, ResultColumnDesc};
use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::Connection;
use scout_core::raw::{RawColumn, RawFk};
use scout_core::TableKey;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// DuckDB database backend
///
/// The connection is shared behind a mutex so the backend is Send + Sync;
/// individual queries serialize on it. The driver is synchronous, so every
/// call runs on the blocking thread pool and never stalls a runtime worker.
/// Queries never mutate the target.
pub struct DuckDbBackend {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DbError::ConnectionFailed {
            message: "in-memory open failed".to_string(),
            source: e,
        })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionFailed {
            message: format!("open failed for {}", path.display()),
            source: e,
        })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create from a connection string (handles :memory: and a
    /// `duckdb://` prefix).
    pub fn new(target: &str) -> DbResult<Self> {
        let path = target.strip_prefix("duckdb://").unwrap_or(target);
        if path == ":memory:" || path.is_empty() {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Test-support access for seeding fixture tables.
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        conn.execute_batch(sql).map_err(|e| DbError::ExecutionFailed {
            context: "batch execution".to_string(),
            source: e,
        })
    }

    /// Run a driver operation on the blocking pool.
    async fn run_blocking<T, F>(&self, op: F) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DbResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
            op(&guard)
        })
        .await
        .map_err(|e| DbError::TaskFailed(e.to_string()))?
    }

    async fn query_owned(&self, sql: String, max_rows: usize) -> DbResult<QueryOutput> {
        self.run_blocking(move |conn| query_conn(conn, &sql, max_rows))
            .await
    }

    async fn string_column(&self, sql: String) -> DbResult<Vec<String>> {
        let out = self.query_owned(sql, usize::MAX).await?;
        Ok(out
            .rows
            .into_iter()
            .filter_map(|mut row| row.drain(..).next().and_then(|v| v.display()))
            .collect())
    }
}

fn query_conn(conn: &Connection, sql: &str, max_rows: usize) -> DbResult<QueryOutput> {
    let mut stmt = conn.prepare(sql).map_err(map_exec_err(sql))?;

    let mut raw_rows: Vec<Vec<DbValue>> = Vec::new();
    let mut rows = stmt.query([]).map_err(map_exec_err(sql))?;
    while let Some(row) = rows.next().map_err(map_exec_err(sql))? {
        if raw_rows.len() >= max_rows {
            break;
        }
        let col_count = row.as_ref().column_count();
        let mut cells = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            let value: Value = row.get(idx).map_err(map_exec_err(sql))?;
            cells.push(convert_value(value));
        }
        raw_rows.push(cells);
    }
    drop(rows);

    // DuckDB exposes result column names on the statement after
    // execution; vendor types are inferred from the first row.
    let names: Vec<String> = (0..stmt.column_count())
        .map(|i| stmt.column_name(i).map_or("?".to_string(), |v| v.to_string()))
        .collect();
    let columns = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| ResultColumnDesc {
            name,
            vendor_type: raw_rows
                .first()
                .map(|r| vendor_type_of(&r[i]))
                .unwrap_or("unknown")
                .to_string(),
        })
        .collect();

    Ok(QueryOutput {
        columns,
        rows: raw_rows,
    })
}

fn map_exec_err(sql: &str) -> impl Fn(duckdb::Error) -> DbError + '_ {
    move |e| {
        let msg = e.to_string();
        let missing_relation = (msg.contains("Table") || msg.contains("Catalog Error"))
            && (msg.contains("does not exist") || msg.contains("not found"));
        if missing_relation {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionFailed {
                context: sql.chars().take(120).collect(),
                source: e,
            }
        }
    }
}

/// Reduce a DuckDB value to the tool-surface value set.
fn convert_value(value: Value) -> DbValue {
    match value {
        Value::Null => DbValue::Null,
        Value::Boolean(b) => DbValue::Bool(b),
        Value::TinyInt(n) => DbValue::Int(n as i64),
        Value::SmallInt(n) => DbValue::Int(n as i64),
        Value::Int(n) => DbValue::Int(n as i64),
        Value::BigInt(n) => DbValue::Int(n),
        Value::HugeInt(n) => i64::try_from(n)
            .map(DbValue::Int)
            .unwrap_or_else(|_| DbValue::Text(n.to_string())),
        Value::UTinyInt(n) => DbValue::Int(n as i64),
        Value::USmallInt(n) => DbValue::Int(n as i64),
        Value::UInt(n) => DbValue::Int(n as i64),
        Value::UBigInt(n) => i64::try_from(n)
            .map(DbValue::Int)
            .unwrap_or_else(|_| DbValue::Text(n.to_string())),
        Value::Float(f) => DbValue::Float(f as f64),
        Value::Double(f) => DbValue::Float(f),
        Value::Decimal(d) => d
            .to_string()
            .parse::<f64>()
            .map(DbValue::Float)
            .unwrap_or_else(|_| DbValue::Text(d.to_string())),
        Value::Text(s) => DbValue::Text(s),
        Value::Blob(bytes) => DbValue::Text(format!("0x{}", hex_of(&bytes, 24))),
        Value::Date32(days) => DbValue::Text(
            chrono::NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
                .map(|d| d.to_string())
                .unwrap_or_else(|| days.to_string()),
        ),
        Value::Timestamp(unit, raw) => DbValue::Text(render_timestamp(unit, raw)),
        other => DbValue::Text(format!("{other:?}")),
    }
}

/// Days from 0001-01-01 (chrono's CE epoch) to 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn render_timestamp(unit: duckdb::types::TimeUnit, raw: i64) -> String {
    let micros = match unit {
        duckdb::types::TimeUnit::Second => raw.saturating_mul(1_000_000),
        duckdb::types::TimeUnit::Millisecond => raw.saturating_mul(1_000),
        duckdb::types::TimeUnit::Microsecond => raw,
        duckdb::types::TimeUnit::Nanosecond => raw / 1_000,
    };
    chrono::DateTime::from_timestamp_micros(micros)
        .map(|dt| dt.naive_utc().to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn hex_of(bytes: &[u8], max: usize) -> String {
    bytes
        .iter()
        .take(max)
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn vendor_type_of(value: &DbValue) -> &'static str {
    match value {
        DbValue::Null => "unknown",
        DbValue::Bool(_) => "boolean",
        DbValue::Int(_) => "bigint",
        DbValue::Float(_) => "double",
        DbValue::Text(_) => "varchar",
    }
}

/// Escape a string literal for embedding in metadata queries.
fn lit(s: &str) -> String {
    s.replace('\'', "''")
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn query(&self, sql: &str, max_rows: usize) -> DbResult<QueryOutput> {
        self.query_owned(sql.to_string(), max_rows).await
    }

    async fn ping(&self) -> DbResult<()> {
        self.query_owned("SELECT 1".to_string(), 1).await.map(|_| ())
    }

    async fn list_relations(&self) -> DbResult<Vec<(String, String)>> {
        let sql = "SELECT table_schema, table_name FROM information_schema.tables \
                   WHERE table_type = 'BASE TABLE' ORDER BY table_schema, table_name";
        let out = self.query_owned(sql.to_string(), usize::MAX).await?;
        Ok(out
            .rows
            .into_iter()
            .filter_map(|row| match (&row[0], &row[1]) {
                (DbValue::Text(s), DbValue::Text(t)) => Some((s.clone(), t.clone())),
                _ => None,
            })
            .collect())
    }

    async fn table_columns(&self, schema: &str, table: &str) -> DbResult<Vec<RawColumn>> {
        let sql = format!(
            "SELECT column_name, data_type, is_nullable FROM information_schema.columns \
             WHERE table_schema = '{}' AND table_name = '{}' ORDER BY ordinal_position",
            lit(schema),
            lit(table)
        );
        let out = self.query_owned(sql, usize::MAX).await?;
        Ok(out
            .rows
            .into_iter()
            .filter_map(|row| {
                let name = row[0].display()?;
                let vendor_type = row[1].display()?;
                let nullable = row[2].display().map(|v| v == "YES").unwrap_or(true);
                Some(RawColumn {
                    name,
                    vendor_type,
                    nullable,
                })
            })
            .collect())
    }

    async fn primary_key(&self, schema: &str, table: &str) -> DbResult<Vec<String>> {
        let sql = format!(
            "SELECT unnest(constraint_column_names) FROM duckdb_constraints() \
             WHERE schema_name = '{}' AND table_name = '{}' \
             AND constraint_type = 'PRIMARY KEY'",
            lit(schema),
            lit(table)
        );
        self.string_column(sql).await
    }

    async fn foreign_keys(&self, schema: &str, table: &str) -> DbResult<Vec<RawFk>> {
        // duckdb_constraints() carries no referenced schema; FK targets are
        // assumed to live in the referencing table's schema.
        let sql = format!(
            "SELECT unnest(constraint_column_names), unnest(referenced_column_names), \
             referenced_table FROM duckdb_constraints() \
             WHERE schema_name = '{}' AND table_name = '{}' \
             AND constraint_type = 'FOREIGN KEY'",
            lit(schema),
            lit(table)
        );
        let out = self.query_owned(sql, usize::MAX).await?;
        Ok(out
            .rows
            .into_iter()
            .filter_map(|row| {
                let column = row[0].display()?;
                let ref_column = row[1].display()?;
                let ref_table = row[2].display()?;
                Some(RawFk {
                    column,
                    ref_table: TableKey::new(schema, ref_table),
                    ref_column,
                })
            })
            .collect())
    }

    async fn approx_rowcount(&self, schema: &str, table: &str) -> DbResult<Option<u64>> {
        let sql = format!(
            "SELECT estimated_size FROM duckdb_tables() \
             WHERE schema_name = '{}' AND table_name = '{}'",
            lit(schema),
            lit(table)
        );
        let out = self.query_owned(sql, 1).await?;
        Ok(out
            .rows
            .first()
            .and_then(|row| row.first())
            .and_then(|v| match v {
                DbValue::Int(n) if *n >= 0 => Some(*n as u64),
                _ => None,
            }))
    }

    fn dialect_name(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_backend_test.rs"]
mod tests;
