//! DuckDB database implementation

use std::path::Path;

use duckdb::types::ValueRef;
use duckdb::Connection;

use crate::domain::result::{Error, Result};
use crate::ports::{Database, QueryResult};

/// DuckDB-backed database session
pub struct DuckDbDatabase {
    conn: Connection,
}

impl DuckDbDatabase {
    /// Open (or create) a database file
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Self::try_open_connection(db_path)
            .map_err(|e| Error::connection(0, format!("{} ({})", e, db_path.display())))?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let config = duckdb::Config::default()
            .enable_autoload_extension(false)
            .map_err(|e| Error::connection(0, e.to_string()))?;
        let conn = Connection::open_in_memory_with_flags(config)
            .map_err(|e| Error::connection(0, e.to_string()))?;
        Ok(Self { conn })
    }

    fn try_open_connection(db_path: &Path) -> duckdb::Result<Connection> {
        // IMPORTANT: Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    fn get_column_value(row: &duckdb::Row, idx: usize) -> serde_json::Value {
        match row.get_ref(idx) {
            Ok(ValueRef::Null) => serde_json::Value::Null,
            Ok(ValueRef::Boolean(b)) => serde_json::Value::Bool(b),
            Ok(ValueRef::TinyInt(i)) => serde_json::json!(i),
            Ok(ValueRef::SmallInt(i)) => serde_json::json!(i),
            Ok(ValueRef::Int(i)) => serde_json::json!(i),
            Ok(ValueRef::BigInt(i)) => serde_json::json!(i),
            Ok(ValueRef::HugeInt(i)) => serde_json::json!(i.to_string()),
            Ok(ValueRef::UTinyInt(i)) => serde_json::json!(i),
            Ok(ValueRef::USmallInt(i)) => serde_json::json!(i),
            Ok(ValueRef::UInt(i)) => serde_json::json!(i),
            Ok(ValueRef::UBigInt(i)) => serde_json::json!(i),
            Ok(ValueRef::Float(f)) => serde_json::json!(f),
            Ok(ValueRef::Double(f)) => serde_json::json!(f),
            Ok(ValueRef::Decimal(d)) => serde_json::Value::String(d.to_string()),
            Ok(ValueRef::Text(bytes)) => {
                serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
            }
            Ok(ValueRef::Blob(bytes)) => {
                serde_json::Value::String(format!("<blob {} bytes>", bytes.len()))
            }
            Ok(other) => serde_json::Value::String(format!("{:?}", other)),
            Err(_) => serde_json::Value::Null,
        }
    }
}

impl Database for DuckDbDatabase {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| Error::database(e.to_string()))
    }

    fn query(&mut self, sql: &str) -> Result<QueryResult> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut result_rows = stmt.query([])?;

        let mut rows: Vec<Vec<serde_json::Value>> = Vec::new();
        let mut column_count = 0;

        while let Some(row) = result_rows.next()? {
            // Get column count from the first row
            if rows.is_empty() {
                column_count = row.as_ref().column_count();
            }
            rows.push(
                (0..column_count)
                    .map(|i| Self::get_column_value(row, i))
                    .collect(),
            );
        }

        // Drop result_rows to release borrow on stmt
        drop(result_rows);

        let count = if column_count > 0 {
            column_count
        } else {
            stmt.column_count()
        };
        let columns = (0..count)
            .map(|i| {
                stmt.column_name(i)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| format!("col{}", i))
            })
            .collect();

        let row_count = rows.len();
        Ok(QueryResult {
            columns,
            rows,
            row_count,
        })
    }
}
