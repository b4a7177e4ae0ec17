//! MySQL database implementation

use std::time::Duration;

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Row, Value};

use crate::config::Settings;
use crate::domain::result::{Error, Result};
use crate::ports::{Database, QueryResult};

/// Bounds connection establishment only; statements run without a timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// MySQL-backed database session
pub struct MySqlDatabase {
    conn: Conn,
}

impl MySqlDatabase {
    /// Connect using `host[:port]`, credentials and schema from `settings`
    pub fn connect(settings: &Settings) -> Result<Self> {
        let (host, port) = split_host(&settings.host);

        let mut opts = OptsBuilder::new()
            .ip_or_hostname(Some(host))
            .user(Some(settings.user.as_str()))
            .pass(Some(settings.password.as_str()))
            .db_name(Some(settings.schema.as_str()))
            .tcp_connect_timeout(Some(CONNECT_TIMEOUT));
        if let Some(port) = port {
            opts = opts.tcp_port(port);
        }

        let conn = Conn::new(opts).map_err(connection_error)?;
        Ok(Self { conn })
    }
}

/// Split an optional `:port` suffix off `host`
fn split_host(host: &str) -> (&str, Option<u16>) {
    match host.rsplit_once(':') {
        Some((name, port)) if !name.is_empty() => match port.parse() {
            Ok(port) => (name, Some(port)),
            Err(_) => (host, None),
        },
        _ => (host, None),
    }
}

fn connection_error(e: mysql::Error) -> Error {
    match e {
        mysql::Error::MySqlError(server) => Error::connection(u32::from(server.code), server.message),
        other => Error::connection(0, other.to_string()),
    }
}

/// Backend message for a rejected statement
fn statement_error(e: mysql::Error) -> Error {
    match e {
        mysql::Error::MySqlError(server) => Error::database(server.message),
        other => Error::database(other.to_string()),
    }
}

fn to_json(value: Value) -> serde_json::Value {
    match value {
        Value::NULL => serde_json::Value::Null,
        Value::Bytes(bytes) => serde_json::Value::String(String::from_utf8_lossy(&bytes).to_string()),
        Value::Int(i) => serde_json::json!(i),
        Value::UInt(u) => serde_json::json!(u),
        Value::Float(f) => serde_json::json!(f),
        Value::Double(f) => serde_json::json!(f),
        other => serde_json::Value::String(other.as_sql(true).trim_matches('\'').to_string()),
    }
}

impl Database for MySqlDatabase {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.conn.query_drop(sql).map_err(statement_error)
    }

    fn query(&mut self, sql: &str) -> Result<QueryResult> {
        let result: Vec<Row> = self.conn.query(sql).map_err(statement_error)?;

        let columns: Vec<String> = result
            .first()
            .map(|row| {
                row.columns_ref()
                    .iter()
                    .map(|c| c.name_str().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Vec<serde_json::Value>> = result
            .into_iter()
            .map(|row| row.unwrap().into_iter().map(to_json).collect())
            .collect();

        let row_count = rows.len();
        Ok(QueryResult {
            columns,
            rows,
            row_count,
        })
    }
}
