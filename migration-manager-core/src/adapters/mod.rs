//! Adapter implementations
//!
//! Adapters implement the `Database` port with concrete drivers:
//! - MySQL over TCP (the default)
//! - DuckDB, a local database file, for embedded use and tests

pub mod duckdb;
pub mod mysql;

use std::path::Path;

use crate::config::{Driver, Settings};
use crate::domain::result::Result;
use crate::ports::DatabaseSession;

/// Open a session for the driver named in `settings`
///
/// A relative DuckDB path is resolved against `project_dir`.
pub fn connect(settings: &Settings, project_dir: &Path) -> Result<DatabaseSession> {
    match settings.driver {
        Driver::Mysql => Ok(Box::new(mysql::MySqlDatabase::connect(settings)?)),
        Driver::Duckdb => Ok(Box::new(duckdb::DuckDbDatabase::open(
            &settings.duckdb_path(project_dir),
        )?)),
    }
}
