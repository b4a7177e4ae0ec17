//! Up command - apply pending migrations

use anyhow::Result;

use migration_manager_core::{Direction, Project};

use super::{get_logger, log_run, report_outcome};
use crate::terminal::{ProgressPrinter, TerminalPrompt};

pub fn run(project: &Project, count: u32, yes: bool) -> Result<()> {
    let logger = get_logger(project);
    let mut service = project.connect()?;
    let result = service.up(
        count,
        &mut TerminalPrompt::new(yes),
        &mut ProgressPrinter::new(),
    );
    log_run(&logger, Direction::Up, &result);

    report_outcome(Direction::Up, &result?);
    Ok(())
}
