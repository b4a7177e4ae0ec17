//! Db-set command - test a connection and save it to settings.json

use anyhow::{Context, Result};

use migration_manager_core::config::{Settings, SETTINGS_FILENAME};
use migration_manager_core::services::logging::EVENT_SETTINGS_SAVED;
use migration_manager_core::services::LogEvent;
use migration_manager_core::{Driver, Project};

use super::{get_logger, log_event};
use crate::output;

pub fn run(
    project: &Project,
    host: String,
    user: String,
    password: String,
    schema: String,
    driver: Driver,
) -> Result<()> {
    let settings = Settings::new(host, user, password, schema).with_driver(driver);

    project
        .save_settings(&settings)
        .with_context(|| format!("\"{}\" was not written", SETTINGS_FILENAME))?;

    log_event(
        &get_logger(project),
        LogEvent::new(EVENT_SETTINGS_SAVED).with_command("db-set"),
    );

    output::success(&format!("\"{}\" generated", SETTINGS_FILENAME));
    Ok(())
}
