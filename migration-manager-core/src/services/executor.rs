//! Migration executor - runs planned migrations statement by statement

use crate::domain::result::{Error, Result};
use crate::domain::{Direction, MigrationFile, MigrationId};
use crate::ports::{Database, MigrationReporter};
use crate::services::records::MigrationRecordStore;
use crate::services::splitter::split_block;

/// Executes migrations in plan order, stopping at the first failure
///
/// There is no transaction around a migration: statements that ran before a
/// failure stay applied, and so do earlier migrations of the same run.
pub struct MigrationExecutor<'a> {
    db: &'a mut dyn Database,
}

impl<'a> MigrationExecutor<'a> {
    pub fn new(db: &'a mut dyn Database) -> Self {
        Self { db }
    }

    /// Run `migrations` in the given order, returning the completed ids
    pub fn run(
        &mut self,
        direction: Direction,
        migrations: &[MigrationFile],
        reporter: &mut dyn MigrationReporter,
    ) -> Result<Vec<MigrationId>> {
        let mut completed = Vec::with_capacity(migrations.len());

        for migration in migrations {
            reporter.started(direction, &migration.id);

            let outcome = self
                .prepare(direction, migration, reporter)
                .and_then(|batch| self.execute_batch(&migration.id, &batch));

            if let Err(e) = outcome {
                reporter.failed(direction, &migration.id, &e);
                return Err(e);
            }

            reporter.finished(direction, &migration.id);
            completed.push(migration.id.clone());
        }

        Ok(completed)
    }

    /// Statement batch for one migration, tracking statement included
    pub fn prepare(
        &self,
        direction: Direction,
        migration: &MigrationFile,
        reporter: &mut dyn MigrationReporter,
    ) -> Result<Vec<String>> {
        let source = std::fs::read_to_string(&migration.path).map_err(|e| Error::FileOpen {
            path: migration.path.clone(),
            source: e,
        })?;

        let block = split_block(&migration.id, &source, direction)?;
        if let Some(text) = &block.trailing {
            reporter.trailing_statement(direction, &migration.id, text);
        }

        let batch = match direction {
            Direction::Up => {
                let mut batch = Vec::with_capacity(block.statements.len() + 1);
                batch.push(MigrationRecordStore::record_applied_sql(&migration.id));
                batch.extend(block.statements);
                batch
            }
            Direction::Down => {
                let mut batch = block.statements;
                batch.push(MigrationRecordStore::record_reverted_sql(&migration.id));
                batch
            }
        };
        Ok(batch)
    }

    fn execute_batch(&mut self, id: &MigrationId, batch: &[String]) -> Result<()> {
        for statement in batch {
            self.db.execute(statement).map_err(|e| Error::StatementFailed {
                id: id.to_string(),
                statement: statement.clone(),
                message: match e {
                    Error::Database(message) => message,
                    other => other.to_string(),
                },
            })?;
        }
        Ok(())
    }
}
