//! Migration Manager CLI - versioned SQL migrations from the terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod output;
mod terminal;

use commands::{create, db_set, down, logs, status, up};
use migration_manager_core::{parse_count, Driver, Error};

/// Migration Manager - apply and revert versioned SQL migrations
#[derive(Parser)]
#[command(name = "migration-manager", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new migration file in migrations/
    Create,

    /// Apply pending migrations, oldest first
    Up {
        /// Number of migrations to apply (0 applies all)
        #[arg(default_value = "0", value_parser = count_arg)]
        count: u32,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Revert the most recently applied migrations, newest first
    Down {
        /// Number of migrations to revert
        #[arg(default_value = "1", value_parser = count_arg)]
        count: u32,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Test a database connection and save it to settings.json
    DbSet {
        /// Host name, optionally with :port
        host: String,
        user: String,
        password: String,
        /// Schema to migrate (database file for the duckdb driver)
        schema: String,
        /// Database driver (mysql, duckdb)
        #[arg(long, default_value = "mysql")]
        driver: Driver,
    },

    /// Show applied and pending migrations
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event journal
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn count_arg(arg: &str) -> std::result::Result<u32, String> {
    parse_count(arg).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !already_reported(&e) {
                output::error(&format!("{:#}", e));
            }
            ExitCode::FAILURE
        }
    }
}

/// Failed statements are printed in full by the progress output
fn already_reported(e: &anyhow::Error) -> bool {
    matches!(e.downcast_ref::<Error>(), Some(Error::StatementFailed { .. }))
}

fn run(command: Commands) -> Result<()> {
    let project = commands::get_project()?;

    if let Some(logger) = commands::get_logger(&project) {
        let _ = logger.log_command(command.name());
    }

    match command {
        Commands::Create => create::run(&project),
        Commands::Up { count, yes } => up::run(&project, count, yes),
        Commands::Down { count, yes } => down::run(&project, count, yes),
        Commands::DbSet {
            host,
            user,
            password,
            schema,
            driver,
        } => db_set::run(&project, host, user, password, schema, driver),
        Commands::Status { json } => status::run(&project, json),
        Commands::Logs { command } => logs::run(&project, command),
    }
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Create => "create",
            Commands::Up { .. } => "up",
            Commands::Down { .. } => "down",
            Commands::DbSet { .. } => "db-set",
            Commands::Status { .. } => "status",
            Commands::Logs { .. } => "logs",
        }
    }
}
