//! Migration service - the `up`, `down` and `status` use cases
//!
//! The service owns the database session for one invocation. Dropping the
//! service closes the connection, whichever way the invocation ends.

use crate::domain::result::Result;
use crate::domain::{Direction, MigrationId};
use crate::ports::{Database, DatabaseSession, MigrationReporter, Prompt};
use crate::services::catalog::MigrationCatalog;
use crate::services::executor::MigrationExecutor;
use crate::services::planner::{MigrationPlanner, MigrationStatus};
use crate::services::records::MigrationRecordStore;

/// How an `up` or `down` invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The plan was empty; nothing was asked or changed
    NothingToDo,
    /// The operator declined; nothing was changed
    Cancelled,
    /// Every planned migration ran, in this order
    Completed(Vec<MigrationId>),
}

/// Service for applying and reverting migrations
pub struct MigrationService {
    session: DatabaseSession,
    catalog: MigrationCatalog,
}

impl MigrationService {
    /// Wrap an open session, creating the tracking table if needed
    pub fn new(mut session: DatabaseSession, catalog: MigrationCatalog) -> Result<Self> {
        MigrationRecordStore::new(session.as_mut()).ensure_table()?;
        Ok(Self { session, catalog })
    }

    pub fn catalog(&self) -> &MigrationCatalog {
        &self.catalog
    }

    /// The underlying session
    pub fn session(&mut self) -> &mut dyn Database {
        self.session.as_mut()
    }

    /// Apply up to `count` pending migrations (0 = all), oldest first
    pub fn up(
        &mut self,
        count: u32,
        prompt: &mut dyn Prompt,
        reporter: &mut dyn MigrationReporter,
    ) -> Result<RunOutcome> {
        let plan = {
            let mut store = MigrationRecordStore::new(self.session.as_mut());
            MigrationPlanner::new(&self.catalog).plan_up(&mut store, count)?
        };

        reporter.last_applied(plan.last_applied.as_ref());
        if plan.is_empty() {
            return Ok(RunOutcome::NothingToDo);
        }

        reporter.planned(Direction::Up, &plan.ids());
        if !prompt.confirm("Apply above migrations?")? {
            return Ok(RunOutcome::Cancelled);
        }

        reporter.executing(Direction::Up);
        let applied = MigrationExecutor::new(self.session.as_mut()).run(
            Direction::Up,
            &plan.migrations,
            reporter,
        )?;
        Ok(RunOutcome::Completed(applied))
    }

    /// Revert up to `count` of the most recently applied migrations, newest first
    pub fn down(
        &mut self,
        count: u32,
        prompt: &mut dyn Prompt,
        reporter: &mut dyn MigrationReporter,
    ) -> Result<RunOutcome> {
        let plan = {
            let mut store = MigrationRecordStore::new(self.session.as_mut());
            MigrationPlanner::new(&self.catalog).plan_down(&mut store, count)?
        };

        if plan.is_empty() {
            return Ok(RunOutcome::NothingToDo);
        }

        reporter.planned(Direction::Down, &plan.ids());
        let question = format!(
            "{} migration(s) applied. Revert {} migration(s)?",
            plan.applied_total, plan.count
        );
        if !prompt.confirm(&question)? {
            return Ok(RunOutcome::Cancelled);
        }

        reporter.executing(Direction::Down);
        let reverted = MigrationExecutor::new(self.session.as_mut()).run(
            Direction::Down,
            &plan.migrations,
            reporter,
        )?;
        Ok(RunOutcome::Completed(reverted))
    }

    /// Applied and pending migrations
    pub fn status(&mut self) -> Result<MigrationStatus> {
        let mut store = MigrationRecordStore::new(self.session.as_mut());
        MigrationPlanner::new(&self.catalog).status(&mut store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbDatabase;
    use crate::ports::SilentReporter;
    use std::io;
    use tempfile::tempdir;

    struct Answer(bool, Vec<String>);

    impl Prompt for Answer {
        fn confirm(&mut self, question: &str) -> io::Result<bool> {
            self.1.push(question.to_string());
            Ok(self.0)
        }
    }

    fn service(dir: &std::path::Path) -> MigrationService {
        let catalog = MigrationCatalog::open(dir.join("migrations")).unwrap();
        std::fs::write(
            catalog.dir().join("m20240101_000000.sql"),
            "-- UP\nCREATE TABLE t(x INT);\n-- DOWN\nDROP TABLE t;\n",
        )
        .unwrap();
        std::fs::write(
            catalog.dir().join("m20240102_000000.sql"),
            "-- UP\nCREATE TABLE u(x INT);\n-- DOWN\nDROP TABLE u;\n",
        )
        .unwrap();
        let session: DatabaseSession = Box::new(DuckDbDatabase::open_in_memory().unwrap());
        MigrationService::new(session, catalog).unwrap()
    }

    #[test]
    fn test_up_nothing_to_do_does_not_prompt() {
        let dir = tempdir().unwrap();
        let mut service = service(dir.path());
        let mut yes = Answer(true, Vec::new());

        service.up(0, &mut yes, &mut SilentReporter).unwrap();
        let outcome = service.up(0, &mut yes, &mut SilentReporter).unwrap();

        assert_eq!(outcome, RunOutcome::NothingToDo);
        assert_eq!(yes.1.len(), 1);
    }

    #[test]
    fn test_down_question_shows_clamped_count() {
        let dir = tempdir().unwrap();
        let mut service = service(dir.path());
        service
            .up(0, &mut Answer(true, Vec::new()), &mut SilentReporter)
            .unwrap();

        let mut no = Answer(false, Vec::new());
        let outcome = service.down(7, &mut no, &mut SilentReporter).unwrap();

        assert_eq!(outcome, RunOutcome::Cancelled);
        assert_eq!(no.1, vec!["2 migration(s) applied. Revert 2 migration(s)?"]);
        assert_eq!(service.status().unwrap().applied.len(), 2);
    }

    #[test]
    fn test_down_nothing_applied() {
        let dir = tempdir().unwrap();
        let mut service = service(dir.path());
        let mut yes = Answer(true, Vec::new());

        let outcome = service.down(1, &mut yes, &mut SilentReporter).unwrap();
        assert_eq!(outcome, RunOutcome::NothingToDo);
        assert!(yes.1.is_empty());
    }
}
