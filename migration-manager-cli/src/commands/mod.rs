//! CLI command implementations

pub mod create;
pub mod db_set;
pub mod down;
pub mod logs;
pub mod status;
pub mod up;

use std::path::PathBuf;

use anyhow::{Context, Result};
use migration_manager_core::services::logging::{
    EVENT_MIGRATIONS_APPLIED, EVENT_MIGRATIONS_REVERTED, EVENT_MIGRATION_FAILED,
};
use migration_manager_core::services::{LogEvent, LoggingService};
use migration_manager_core::{Direction, Error, Project, RunOutcome};

use crate::output;

/// Get the project directory from environment or the current directory
pub fn get_project_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MIGRATION_MANAGER_DIR") {
        Ok(PathBuf::from(dir))
    } else {
        std::env::current_dir().context("Could not determine the current directory")
    }
}

/// Open the project, creating `migrations/` if it doesn't exist yet
pub fn get_project() -> Result<Project> {
    let dir = get_project_dir()?;
    Ok(Project::open(dir)?)
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger(project: &Project) -> Option<LoggingService> {
    LoggingService::new(&project.state_dir(), env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Record how an `up` or `down` run ended
pub fn log_run(
    logger: &Option<LoggingService>,
    direction: Direction,
    result: &migration_manager_core::Result<RunOutcome>,
) {
    let command = direction.to_string();
    match result {
        Ok(RunOutcome::Completed(ids)) => {
            let event = match direction {
                Direction::Up => EVENT_MIGRATIONS_APPLIED,
                Direction::Down => EVENT_MIGRATIONS_REVERTED,
            };
            let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
            log_event(
                logger,
                LogEvent::new(event)
                    .with_command(command)
                    .with_migration(ids.join(",")),
            );
        }
        Ok(_) => {}
        Err(e) => {
            let mut event = LogEvent::new(EVENT_MIGRATION_FAILED)
                .with_command(command)
                .with_error(e.to_string());
            match e {
                Error::StatementFailed { id, statement, message } => {
                    event = event
                        .with_migration(id.clone())
                        .with_error(message.clone())
                        .with_error_details(statement.clone());
                }
                Error::BlockNotFound { id, .. } => event = event.with_migration(id.clone()),
                _ => {}
            }
            log_event(logger, event);
        }
    }
}

/// Print the closing line of an `up` or `down` run
pub fn report_outcome(direction: Direction, outcome: &RunOutcome) {
    match (outcome, direction) {
        (RunOutcome::NothingToDo, Direction::Up) => println!("No migrations available"),
        (RunOutcome::NothingToDo, Direction::Down) => println!("No migrations found to revert"),
        (RunOutcome::Cancelled, _) => output::info("Cancelled"),
        (RunOutcome::Completed(_), Direction::Up) => output::success("\nAll migrations applied!"),
        (RunOutcome::Completed(_), Direction::Down) => output::success("\nAll migrations reverted!"),
    }
}
