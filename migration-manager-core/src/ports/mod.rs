//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external collaborators: the database
//! driver and the operator at the terminal. The core depends only on these
//! traits, not on concrete implementations.

mod database;
mod interaction;

pub use database::{value_as_string, value_as_u64, Database, DatabaseSession, QueryResult};
pub use interaction::{MigrationReporter, Prompt, SilentReporter};
