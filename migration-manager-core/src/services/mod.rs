//! Service layer - migration use cases
//!
//! Leaves first: the catalog and record store read state, the splitter and
//! planner decide what to run, the executor runs it, and `MigrationService`
//! wires them together for one invocation.

mod catalog;
mod executor;
pub mod logging;
pub mod migration;
mod planner;
mod records;
pub mod splitter;

pub use catalog::{MigrationCatalog, MIGRATIONS_DIRNAME, MIGRATION_TEMPLATE};
pub use executor::MigrationExecutor;
pub use logging::{LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationService, RunOutcome};
pub use planner::{select_pending, DownPlan, MigrationPlanner, MigrationStatus, UpPlan};
pub use records::{MigrationRecordStore, TRACKING_TABLE};
pub use splitter::{split_block, ParsedBlock, DEFAULT_DELIMITER};
