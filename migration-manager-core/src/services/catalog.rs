//! Migration file catalog - the `migrations/` directory

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::domain::result::{Error, Result};
use crate::domain::{MigrationFile, MigrationId, MIGRATION_EXTENSION};

/// Directory name of the catalog inside a project
pub const MIGRATIONS_DIRNAME: &str = "migrations";

/// Content of a freshly created migration
pub const MIGRATION_TEMPLATE: &str = "-- UP\n\n-- DOWN\n\n";

/// Lists and creates migration files
#[derive(Debug, Clone)]
pub struct MigrationCatalog {
    dir: PathBuf,
}

impl MigrationCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the catalog, creating the directory if it doesn't exist
    ///
    /// Fails when the path exists but is not a directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        } else if !dir.is_dir() {
            return Err(Error::NotADirectory(dir));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a migration is stored under, whether or not it exists
    pub fn path_for(&self, id: &MigrationId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    /// All migration files, ascending by identifier
    ///
    /// Only regular `*.sql` files count. An absent directory yields no files.
    pub fn list_ordered(&self) -> Result<Vec<MigrationFile>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(MIGRATION_EXTENSION) {
                continue;
            }
            if let Some(id) = MigrationId::from_path(&path) {
                files.push(MigrationFile::new(id, path));
            }
        }

        files.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.path.cmp(&b.path)));
        Ok(files)
    }

    /// Write a new migration stub named after `now`
    ///
    /// Never overwrites: creating twice within the same second fails.
    pub fn create(&self, now: NaiveDateTime) -> Result<MigrationFile> {
        let id = MigrationId::from_timestamp(now);
        let path = self.path_for(&id);

        let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        file.write_all(MIGRATION_TEMPLATE.as_bytes())?;

        Ok(MigrationFile::new(id, path))
    }
}
