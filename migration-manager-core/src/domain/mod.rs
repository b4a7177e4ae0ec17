//! Core domain types
//!
//! Plain data structures describing migrations. No I/O happens here.

mod migration;
pub mod result;

pub use migration::{parse_count, Direction, MigrationFile, MigrationId, MIGRATION_EXTENSION};
