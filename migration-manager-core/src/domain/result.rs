//! Result and error types for the core library

use std::path::PathBuf;

use thiserror::Error;

use super::Direction;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("\"{}\" not found", .0.display())]
    ConfigMissing(PathBuf),

    #[error("{0}")]
    ConfigMalformed(String),

    #[error("Error: {message}; Code: {code}")]
    Connection { code: u32, message: String },

    #[error("Cannot create \"{}\" directory because file with the same name already exists!", .0.display())]
    NotADirectory(PathBuf),

    #[error("{direction} block not found in {id}")]
    BlockNotFound { id: String, direction: Direction },

    #[error("failed to open file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Migration {id} failed on query:\n{statement}\n{message}")]
    StatementFailed {
        id: String,
        statement: String,
        message: String,
    },

    #[error("The number of migrations must be an integer! (got \"{0}\")")]
    InvalidCount(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a malformed configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigMalformed(msg.into())
    }

    /// Create a connection error; `code` is 0 when the backend reports none
    pub fn connection(code: u32, msg: impl Into<String>) -> Self {
        Self::Connection {
            code,
            message: msg.into(),
        }
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
