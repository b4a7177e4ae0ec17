//! Migration Manager Core - versioned SQL migrations for relational databases
//!
//! This crate implements the migration engine following hexagonal architecture:
//!
//! - **domain**: Migration ids, files, directions and the error type
//! - **ports**: Trait definitions for external collaborators (Database, Prompt, MigrationReporter)
//! - **services**: Catalog, record store, statement splitter, planner, executor
//! - **adapters**: Concrete implementations (MySQL, DuckDB)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};

use config::Settings;
use services::{MigrationCatalog, MIGRATIONS_DIRNAME};

// Re-export commonly used types at crate root
pub use config::Driver;
pub use domain::result::{Error, Result};
pub use domain::{parse_count, Direction, MigrationFile, MigrationId};
pub use ports::{Database, DatabaseSession, MigrationReporter, Prompt, QueryResult};
pub use services::{MigrationService, MigrationStatus, RunOutcome};

/// Directory for the tool's own state (the event journal)
pub const STATE_DIRNAME: &str = ".migration-manager";

/// Main context for one project directory
///
/// A project is a directory holding `settings.json` and `migrations/`.
/// Opening it makes sure the migrations directory exists; the database is
/// only touched by [`Project::connect`].
pub struct Project {
    dir: PathBuf,
    pub catalog: MigrationCatalog,
}

impl Project {
    /// Open a project, creating `migrations/` if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let catalog = MigrationCatalog::open(dir.join(MIGRATIONS_DIRNAME))?;
        Ok(Self { dir, catalog })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn state_dir(&self) -> PathBuf {
        self.dir.join(STATE_DIRNAME)
    }

    /// Load `settings.json`
    pub fn settings(&self) -> Result<Settings> {
        Settings::load(&self.dir)
    }

    /// Test-connect with `settings` and write them to `settings.json`.
    /// Nothing is written when the connection fails.
    pub fn save_settings(&self, settings: &Settings) -> Result<PathBuf> {
        drop(adapters::connect(settings, &self.dir)?);
        settings.save(&self.dir)
    }

    /// Open a database session with the saved settings
    pub fn connect(&self) -> Result<MigrationService> {
        let settings = self.settings()?;
        self.connect_with(&settings)
    }

    /// Open a database session with explicit settings
    pub fn connect_with(&self, settings: &Settings) -> Result<MigrationService> {
        let session = adapters::connect(settings, &self.dir)?;
        MigrationService::new(session, self.catalog.clone())
    }
}
