//! Database port - statement execution abstraction

use serde::Serialize;

use crate::domain::result::Result;

/// A live database connection
///
/// Implementations (adapters) provide the actual driver access. Every method
/// runs synchronously; statements are auto-committed individually.
pub trait Database {
    /// Execute one statement, discarding any rows it produces.
    ///
    /// Rejections are reported as `Error::Database` carrying the backend's
    /// message verbatim.
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// Execute a query and collect its rows
    fn query(&mut self, sql: &str) -> Result<QueryResult>;
}

/// The database session for one invocation.
///
/// Dropping the session closes the connection.
pub type DatabaseSession = Box<dyn Database>;

/// Result of a SQL query
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
}

impl QueryResult {
    /// First column of the first row
    pub fn scalar(&self) -> Option<&serde_json::Value> {
        self.rows.first().and_then(|row| row.first())
    }

    /// First column of every row rendered as text, skipping NULLs
    pub fn first_column_strings(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.first())
            .filter_map(value_as_string)
            .collect()
    }
}

/// Render a JSON cell as text. Text protocols deliver numbers as strings,
/// so both shapes are accepted.
pub fn value_as_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read a JSON cell as an unsigned count
pub fn value_as_u64(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
