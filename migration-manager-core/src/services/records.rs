//! Tracking table of applied migrations

use crate::domain::result::{Error, Result};
use crate::domain::MigrationId;
use crate::ports::{value_as_u64, Database};

/// Name of the tracking table
pub const TRACKING_TABLE: &str = "migrations";

/// Read/write access to the `migrations(id)` tracking table
///
/// Inserts and deletes are not executed here: they are handed out as SQL so
/// the executor can run them inside the migration's own statement batch.
pub struct MigrationRecordStore<'a> {
    db: &'a mut dyn Database,
}

impl<'a> MigrationRecordStore<'a> {
    pub fn new(db: &'a mut dyn Database) -> Self {
        Self { db }
    }

    /// Create the tracking table if it doesn't exist yet
    pub fn ensure_table(&mut self) -> Result<()> {
        self.db.execute(&format!(
            "CREATE TABLE IF NOT EXISTS {} (id VARCHAR(64) NOT NULL PRIMARY KEY)",
            TRACKING_TABLE
        ))
    }

    /// Number of applied migrations
    pub fn count_applied(&mut self) -> Result<u64> {
        let result = self
            .db
            .query(&format!("SELECT COUNT(*) FROM {}", TRACKING_TABLE))?;
        result
            .scalar()
            .and_then(value_as_u64)
            .ok_or_else(|| Error::database("COUNT(*) returned no usable value"))
    }

    /// The greatest applied identifier
    pub fn last_applied(&mut self) -> Result<Option<MigrationId>> {
        Ok(self.list_latest(1)?.into_iter().next())
    }

    /// At most `limit` applied identifiers, newest first
    pub fn list_latest(&mut self, limit: u32) -> Result<Vec<MigrationId>> {
        let result = self.db.query(&format!(
            "SELECT id FROM {} ORDER BY id DESC LIMIT {}",
            TRACKING_TABLE, limit
        ))?;
        Ok(result
            .first_column_strings()
            .into_iter()
            .map(MigrationId::new)
            .collect())
    }

    /// Every applied identifier, oldest first
    pub fn list_all(&mut self) -> Result<Vec<MigrationId>> {
        let result = self
            .db
            .query(&format!("SELECT id FROM {} ORDER BY id ASC", TRACKING_TABLE))?;
        Ok(result
            .first_column_strings()
            .into_iter()
            .map(MigrationId::new)
            .collect())
    }

    /// Statement recording `id` as applied
    pub fn record_applied_sql(id: &MigrationId) -> String {
        format!(
            "INSERT INTO {} (id) VALUES ({});",
            TRACKING_TABLE,
            id.sql_literal()
        )
    }

    /// Statement removing the record of `id`
    pub fn record_reverted_sql(id: &MigrationId) -> String {
        format!(
            "DELETE FROM {} WHERE id = {};",
            TRACKING_TABLE,
            id.sql_literal()
        )
    }
}
