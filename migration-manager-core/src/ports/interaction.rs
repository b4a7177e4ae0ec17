//! Operator interaction ports
//!
//! Defines how the core asks the operator for confirmation and how it
//! reports progress while a plan runs. The CLI implements both on top of the
//! terminal; tests use scripted implementations.

use std::io;

use crate::domain::result::Error;
use crate::domain::{Direction, MigrationId};

/// Yes/no confirmation
pub trait Prompt {
    /// Ask `question` and block until the operator answers.
    ///
    /// Returns `false` when the operator declines.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Progress notifications emitted while planning and executing migrations
///
/// Every method has an empty default so implementations only override what
/// they display.
pub trait MigrationReporter {
    /// The most recently applied migration, reported before an `up` plan
    fn last_applied(&mut self, _id: Option<&MigrationId>) {}

    /// The planned migrations, in execution order, before confirmation
    fn planned(&mut self, _direction: Direction, _ids: &[MigrationId]) {}

    /// Execution is about to begin
    fn executing(&mut self, _direction: Direction) {}

    /// A migration's statements are about to run
    fn started(&mut self, _direction: Direction, _id: &MigrationId) {}

    /// All statements of a migration succeeded
    fn finished(&mut self, _direction: Direction, _id: &MigrationId) {}

    /// A migration stopped the run
    fn failed(&mut self, _direction: Direction, _id: &MigrationId, _error: &Error) {}

    /// A block ended with text that was never terminated by its delimiter;
    /// that text is not executed
    fn trailing_statement(&mut self, _direction: Direction, _id: &MigrationId, _text: &str) {}
}

/// Reporter that discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl MigrationReporter for SilentReporter {}
