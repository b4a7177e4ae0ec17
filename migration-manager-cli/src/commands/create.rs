//! Create command - write a new, empty migration file

use anyhow::{Context, Result};

use migration_manager_core::services::logging::EVENT_COMMAND_EXECUTED;
use migration_manager_core::services::LogEvent;
use migration_manager_core::{MigrationId, Project};

use super::{get_logger, log_event};
use crate::output;

pub fn run(project: &Project) -> Result<()> {
    let now = chrono::Local::now().naive_local();
    let file = project.catalog.create(now).with_context(|| {
        format!(
            "Failed to create {}",
            MigrationId::from_timestamp(now).file_name()
        )
    })?;

    log_event(
        &get_logger(project),
        LogEvent::new(EVENT_COMMAND_EXECUTED)
            .with_command("create")
            .with_migration(file.id.as_str()),
    );

    output::success(&format!("{} created!", file.id.file_name()));
    Ok(())
}
