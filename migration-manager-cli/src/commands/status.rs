//! Status command - applied and pending migrations

use anyhow::Result;
use colored::Colorize;

use migration_manager_core::Project;

use crate::output;

pub fn run(project: &Project, json: bool) -> Result<()> {
    let mut service = project.connect()?;
    let status = service.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Migration Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Applied", &status.applied.len().to_string()]);
    table.add_row(vec![
        "Last applied",
        status
            .last_applied
            .as_ref()
            .map(|id| id.as_str())
            .unwrap_or("-"),
    ]);
    table.add_row(vec!["Pending", &status.pending.len().to_string()]);
    println!("{}", table);

    if !status.pending.is_empty() {
        println!();
        println!("{}", "Pending Migrations".bold());
        for id in &status.pending {
            println!("  • {}", id);
        }
    }

    if !status.missing.is_empty() {
        println!();
        output::warning("Applied migrations without a file:");
        for id in &status.missing {
            println!("  • {}", id);
        }
    }

    Ok(())
}
