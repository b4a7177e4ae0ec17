//! Event journal schema - embedded SQL files
//!
//! Each entry is (filename, sql_content), applied in order and recorded in
//! `sys_migrations`. These are unrelated to the user's `migrations/` directory.

/// Add new files at the end: NNN_description.sql
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];

/// Name of the bootstrap migration creating `sys_migrations`
pub const BOOTSTRAP_MIGRATION: &str = "000_migrations.sql";
