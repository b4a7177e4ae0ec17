//! Migration identity types

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// File extension of migration files
pub const MIGRATION_EXTENSION: &str = "sql";

/// Timestamp layout embedded in identifiers (after the `m` prefix)
const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Identifier of a migration, e.g. `m20240101_000000`
///
/// Identifiers are fixed-width and zero-padded, so ordering the strings
/// orders the migrations chronologically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationId(String);

impl MigrationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the identifier for a migration created at `timestamp`
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        Self(format!("m{}", timestamp.format(ID_TIMESTAMP_FORMAT)))
    }

    /// Derive the identifier from a file name: everything before the first `.`
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let stem = name.split('.').next()?;
        if stem.is_empty() {
            return None;
        }
        Some(Self(stem.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name this identifier is stored under
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, MIGRATION_EXTENSION)
    }

    /// The identifier as a single-quoted SQL string literal
    pub fn sql_literal(&self) -> String {
        format!("'{}'", self.0.replace('\'', "''"))
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MigrationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A migration file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    pub id: MigrationId,
    pub path: PathBuf,
}

impl MigrationFile {
    pub fn new(id: MigrationId, path: PathBuf) -> Self {
        Self { id, path }
    }
}

/// Which block of a migration file to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Marker line that opens this direction's block
    pub fn marker(&self) -> &'static str {
        match self {
            Direction::Up => "-- UP",
            Direction::Down => "-- DOWN",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a migration count argument
///
/// Accepts any non-negative integer; used as a clap value parser.
pub fn parse_count(arg: &str) -> Result<u32> {
    arg.trim()
        .parse::<u32>()
        .map_err(|_| Error::InvalidCount(arg.to_string()))
}
