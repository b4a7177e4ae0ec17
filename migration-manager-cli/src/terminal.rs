//! Terminal adapter - confirmation prompt and progress output

use std::io::{self, BufRead, Write};

use colored::Colorize;
use dialoguer::Confirm;

use migration_manager_core::{Direction, Error, MigrationId, MigrationReporter, Prompt};

use crate::output;

const FRAME: &str = "==============================";

/// Confirmation prompt on the controlling terminal
pub struct TerminalPrompt {
    /// Answer every confirmation with yes (`--yes`)
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

/// Prints migration progress to stdout
#[derive(Default)]
pub struct ProgressPrinter {
    /// Warnings printed once the current migration's status line is complete
    pending_warnings: Vec<String>,
}

impl ProgressPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush_warnings(&mut self) {
        for warning in self.pending_warnings.drain(..) {
            output::warning(&warning);
        }
    }
}

/// Ask `question` on `output`, reading whole lines from `input` until the
/// answer is y or n. End of input declines.
pub fn read_answer(
    question: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<bool> {
    write!(output, "{} (y/n): ", question)?;
    output.flush()?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => {
                write!(output, "Please enter 'y' to confirm or 'n' to cancel: ")?;
                output.flush()?;
            }
        }
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        if self.assume_yes {
            println!("{} (y/n): y", question);
            return Ok(true);
        }

        if atty::is(atty::Stream::Stdin) {
            Confirm::new()
                .with_prompt(question)
                .interact()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
        } else {
            read_answer(question, &mut io::stdin().lock(), &mut io::stdout())
        }
    }
}

impl MigrationReporter for ProgressPrinter {
    fn last_applied(&mut self, id: Option<&MigrationId>) {
        match id {
            Some(id) => println!("Last applied migration: {}", id),
            None => println!("No applied migrations found"),
        }
    }

    fn planned(&mut self, direction: Direction, ids: &[MigrationId]) {
        let title = match direction {
            Direction::Up => "Applicable migrations",
            Direction::Down => "Migrations to revert",
        };
        println!("\n{} ({} pcs.):", title, ids.len());
        for id in ids {
            println!("{}", id);
        }
        println!();
    }

    fn executing(&mut self, direction: Direction) {
        match direction {
            Direction::Up => println!("\nApplying migrations:"),
            Direction::Down => println!("\nReverting migrations:"),
        }
    }

    fn started(&mut self, _direction: Direction, id: &MigrationId) {
        print!("{}...", id);
        let _ = io::stdout().flush();
    }

    fn finished(&mut self, _direction: Direction, _id: &MigrationId) {
        println!("{}", "done!".green());
        self.flush_warnings();
    }

    fn failed(&mut self, _direction: Direction, _id: &MigrationId, error: &Error) {
        println!("{}", "failed!".red());
        if let Error::StatementFailed {
            statement, message, ..
        } = error
        {
            println!("{}", FRAME);
            println!("Query:\n{}\n", statement.trim_end());
            println!("Error:\n{}", message);
            println!("{}\n", FRAME);
        }
        self.flush_warnings();
    }

    fn trailing_statement(&mut self, direction: Direction, id: &MigrationId, text: &str) {
        self.pending_warnings.push(format!(
            "Warning: {} block of {} ends without a delimiter; this text was not executed:\n{}",
            direction,
            id,
            text.trim_end()
        ));
    }
}
