//! Integration tests for migration-manager-core
//!
//! Every test runs the full service against a real DuckDB file in a temporary
//! project directory. The operator is scripted at the trait level.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::io;

use chrono::NaiveDate;
use tempfile::TempDir;

use migration_manager_core::config::Settings;
use migration_manager_core::{
    Database, Direction, Driver, Error, MigrationId, MigrationReporter, MigrationService, Project,
    Prompt, RunOutcome,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Answers every confirmation the same way and remembers the questions
struct ScriptedPrompt {
    answer: bool,
    questions: Vec<String>,
}

impl ScriptedPrompt {
    fn yes() -> Self {
        Self {
            answer: true,
            questions: Vec::new(),
        }
    }

    fn no() -> Self {
        Self {
            answer: false,
            questions: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.questions.push(question.to_string());
        Ok(self.answer)
    }
}

/// Records reporter calls as short strings
#[derive(Default)]
struct RecordingReporter {
    events: Vec<String>,
}

impl MigrationReporter for RecordingReporter {
    fn planned(&mut self, direction: Direction, ids: &[MigrationId]) {
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        self.events.push(format!("planned {} {}", direction, ids.join(",")));
    }

    fn started(&mut self, direction: Direction, id: &MigrationId) {
        self.events.push(format!("started {} {}", direction, id));
    }

    fn finished(&mut self, direction: Direction, id: &MigrationId) {
        self.events.push(format!("finished {} {}", direction, id));
    }

    fn failed(&mut self, direction: Direction, id: &MigrationId, _error: &Error) {
        self.events.push(format!("failed {} {}", direction, id));
    }

    fn trailing_statement(&mut self, _direction: Direction, id: &MigrationId, text: &str) {
        self.events.push(format!("trailing {} {}", id, text.trim()));
    }
}

/// Project with DuckDB settings saved to `settings.json`
fn create_project(temp_dir: &TempDir) -> Project {
    Settings::new("localhost", "root", "secret", "app.duckdb")
        .with_driver(Driver::Duckdb)
        .save(temp_dir.path())
        .expect("Failed to save settings");
    Project::open(temp_dir.path()).expect("Failed to open project")
}

fn write_migration(project: &Project, id: &str, body: &str) {
    std::fs::write(project.catalog.dir().join(format!("{}.sql", id)), body)
        .expect("Failed to write migration");
}

fn simple_migration(table: &str) -> String {
    format!(
        "-- UP\nCREATE TABLE {t}(x INT);\n-- DOWN\nDROP TABLE {t};\n",
        t = table
    )
}

fn applied(service: &mut MigrationService) -> Vec<String> {
    service
        .status()
        .expect("Failed to read status")
        .applied
        .into_iter()
        .map(|id| id.to_string())
        .collect()
}

fn table_exists(service: &mut MigrationService, table: &str) -> bool {
    service
        .session()
        .query(&format!("SELECT COUNT(*) FROM {}", table))
        .is_ok()
}

fn up(service: &mut MigrationService, count: u32) -> Result<RunOutcome, Error> {
    service.up(count, &mut ScriptedPrompt::yes(), &mut RecordingReporter::default())
}

fn down(service: &mut MigrationService, count: u32) -> Result<RunOutcome, Error> {
    service.down(count, &mut ScriptedPrompt::yes(), &mut RecordingReporter::default())
}

fn seed_four(project: &Project) {
    for (id, table) in [
        ("m20240101_000000", "a"),
        ("m20240102_000000", "b"),
        ("m20240103_000000", "c"),
        ("m20240104_000000", "d"),
    ] {
        write_migration(project, id, &simple_migration(table));
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[test]
fn test_created_migrations_list_in_creation_order() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);

    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let later = project
        .catalog
        .create(day.and_hms_opt(12, 0, 0).unwrap())
        .unwrap();
    let earlier = project
        .catalog
        .create(day.and_hms_opt(9, 30, 5).unwrap())
        .unwrap();
    std::fs::write(project.catalog.dir().join("README.md"), "notes").unwrap();

    let listed: Vec<MigrationId> = project
        .catalog
        .list_ordered()
        .unwrap()
        .into_iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(listed, vec![earlier.id, later.id]);
    assert_eq!(listed[0].as_str(), "m20240301_093005");
}

// ============================================================================
// Up
// ============================================================================

#[test]
fn test_single_migration_up_and_down() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    write_migration(&project, "m20240101_000000", &simple_migration("t"));

    let mut service = project.connect().unwrap();
    let outcome = up(&mut service, 0).unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Completed(vec![MigrationId::new("m20240101_000000")])
    );
    assert_eq!(applied(&mut service), vec!["m20240101_000000"]);
    assert!(table_exists(&mut service, "t"));

    let outcome = down(&mut service, 1).unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Completed(vec![MigrationId::new("m20240101_000000")])
    );
    assert!(applied(&mut service).is_empty());
    assert!(!table_exists(&mut service, "t"));
}

#[test]
fn test_up_all_and_up_with_count() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    seed_four(&project);

    let mut service = project.connect().unwrap();
    up(&mut service, 2).unwrap();
    assert_eq!(
        applied(&mut service),
        vec!["m20240101_000000", "m20240102_000000"]
    );

    // count larger than what is pending applies the rest
    up(&mut service, 10).unwrap();
    assert_eq!(applied(&mut service).len(), 4);

    assert_eq!(up(&mut service, 0).unwrap(), RunOutcome::NothingToDo);
}

#[test]
fn test_up_reports_progress_in_ascending_order() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    seed_four(&project);

    let mut service = project.connect().unwrap();
    let mut reporter = RecordingReporter::default();
    service
        .up(2, &mut ScriptedPrompt::yes(), &mut reporter)
        .unwrap();

    assert_eq!(
        reporter.events,
        vec![
            "planned up m20240101_000000,m20240102_000000",
            "started up m20240101_000000",
            "finished up m20240101_000000",
            "started up m20240102_000000",
            "finished up m20240102_000000",
        ]
    );
}

#[test]
fn test_state_survives_reconnect() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    seed_four(&project);

    {
        let mut service = project.connect().unwrap();
        up(&mut service, 1).unwrap();
    }

    let mut service = project.connect().unwrap();
    let status = service.status().unwrap();
    assert_eq!(
        status.last_applied,
        Some(MigrationId::new("m20240101_000000"))
    );
    assert_eq!(status.pending.len(), 3);
}

// ============================================================================
// Down
// ============================================================================

#[test]
fn test_up_then_down_one_restores_tracking_state() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    seed_four(&project);

    let mut service = project.connect().unwrap();
    up(&mut service, 2).unwrap();
    let before = applied(&mut service);

    up(&mut service, 1).unwrap();
    down(&mut service, 1).unwrap();

    assert_eq!(applied(&mut service), before);
    assert!(!table_exists(&mut service, "c"));
}

#[test]
fn test_down_clamps_to_applied_count() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    seed_four(&project);

    let mut service = project.connect().unwrap();
    up(&mut service, 2).unwrap();

    let mut prompt = ScriptedPrompt::yes();
    let mut reporter = RecordingReporter::default();
    let outcome = service.down(10, &mut prompt, &mut reporter).unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Completed(vec![
            MigrationId::new("m20240102_000000"),
            MigrationId::new("m20240101_000000"),
        ])
    );
    assert_eq!(
        prompt.questions,
        vec!["2 migration(s) applied. Revert 2 migration(s)?"]
    );
    assert!(applied(&mut service).is_empty());
    assert_eq!(down(&mut service, 1).unwrap(), RunOutcome::NothingToDo);
}

// ============================================================================
// Confirmation
// ============================================================================

#[test]
fn test_declining_changes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    seed_four(&project);

    let mut service = project.connect().unwrap();
    let outcome = service
        .up(0, &mut ScriptedPrompt::no(), &mut RecordingReporter::default())
        .unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert!(applied(&mut service).is_empty());
    assert!(!table_exists(&mut service, "a"));

    up(&mut service, 1).unwrap();
    let outcome = service
        .down(1, &mut ScriptedPrompt::no(), &mut RecordingReporter::default())
        .unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert_eq!(applied(&mut service), vec!["m20240101_000000"]);
    assert!(table_exists(&mut service, "a"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_up_block_stops_before_touching_the_store() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    write_migration(&project, "m20240101_000000", &simple_migration("a"));
    write_migration(&project, "m20240102_000000", "CREATE TABLE b(x INT);\n");
    write_migration(&project, "m20240103_000000", &simple_migration("c"));

    let mut service = project.connect().unwrap();
    let mut reporter = RecordingReporter::default();
    let err = service
        .up(0, &mut ScriptedPrompt::yes(), &mut reporter)
        .unwrap_err();

    assert!(matches!(
        err,
        Error::BlockNotFound {
            direction: Direction::Up,
            ..
        }
    ));
    assert_eq!(reporter.events.last().unwrap(), "failed up m20240102_000000");
    assert_eq!(applied(&mut service), vec!["m20240101_000000"]);
    assert!(!table_exists(&mut service, "c"));
}

#[test]
fn test_missing_down_block_leaves_record() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    write_migration(&project, "m20240101_000000", "-- UP\nCREATE TABLE t(x INT);\n");

    let mut service = project.connect().unwrap();
    up(&mut service, 0).unwrap();

    let err = down(&mut service, 1).unwrap_err();
    assert_eq!(err.to_string(), "down block not found in m20240101_000000");
    assert_eq!(applied(&mut service), vec!["m20240101_000000"]);
}

#[test]
fn test_deleted_file_cannot_be_reverted() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    write_migration(&project, "m20240101_000000", &simple_migration("t"));

    let mut service = project.connect().unwrap();
    up(&mut service, 0).unwrap();
    std::fs::remove_file(project.catalog.dir().join("m20240101_000000.sql")).unwrap();

    assert_eq!(
        service.status().unwrap().missing,
        vec![MigrationId::new("m20240101_000000")]
    );
    assert!(matches!(down(&mut service, 1), Err(Error::FileOpen { .. })));
}

#[test]
fn test_failing_statement_keeps_earlier_work() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    write_migration(&project, "m20240101_000000", &simple_migration("a"));
    write_migration(
        &project,
        "m20240102_000000",
        "-- UP\nINSERT INTO a VALUES (1);\nINSERT INTO missing VALUES (1);\n-- DOWN\n",
    );

    let mut service = project.connect().unwrap();
    match up(&mut service, 0).unwrap_err() {
        Error::StatementFailed {
            id,
            statement,
            message,
        } => {
            assert_eq!(id, "m20240102_000000");
            assert_eq!(statement, "INSERT INTO missing VALUES (1);\n");
            assert!(!message.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }

    // no transaction wraps a migration: its record and first insert remain
    assert_eq!(
        applied(&mut service),
        vec!["m20240101_000000", "m20240102_000000"]
    );
    let rows = service.session().query("SELECT COUNT(*) FROM a").unwrap();
    assert_eq!(rows.scalar(), Some(&serde_json::json!(1)));
}

// ============================================================================
// Statement splitting end to end
// ============================================================================

#[test]
fn test_custom_delimiter_block_runs_as_one_statement() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    write_migration(
        &project,
        "m20240101_000000",
        "-- UP\nCREATE TABLE t(x INT);\nDELIMITER $$\nINSERT INTO t VALUES (1); INSERT INTO t VALUES (2);\nINSERT INTO t VALUES (3)$$\nDELIMITER ;\nINSERT INTO t VALUES (4);\n-- DOWN\nDROP TABLE t;\n",
    );

    let mut service = project.connect().unwrap();
    up(&mut service, 0).unwrap();

    let rows = service.session().query("SELECT COUNT(*) FROM t").unwrap();
    assert_eq!(rows.scalar(), Some(&serde_json::json!(4)));
}

#[test]
fn test_trailing_statement_is_reported_not_run() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);
    write_migration(
        &project,
        "m20240101_000000",
        "-- UP\nCREATE TABLE t(x INT);\nCREATE TABLE u(x INT)\n-- DOWN\nDROP TABLE t;\n",
    );

    let mut service = project.connect().unwrap();
    let mut reporter = RecordingReporter::default();
    service
        .up(0, &mut ScriptedPrompt::yes(), &mut reporter)
        .unwrap();

    assert!(reporter
        .events
        .contains(&"trailing m20240101_000000 CREATE TABLE u(x INT)".to_string()));
    assert!(table_exists(&mut service, "t"));
    assert!(!table_exists(&mut service, "u"));
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_settings_roundtrip_through_project() {
    let temp_dir = TempDir::new().unwrap();
    let project = create_project(&temp_dir);

    let settings = project.settings().unwrap();
    assert_eq!(settings.driver, Driver::Duckdb);
    assert_eq!(settings.schema, "app.duckdb");

    let content = std::fs::read_to_string(temp_dir.path().join("settings.json")).unwrap();
    assert!(content.starts_with("/* THIS FILE GENERATED AUTOMATICALLY."));
    assert!(content.contains("\n    \"host\": \"localhost\""));
}

#[test]
fn test_malformed_settings_block_connect() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.json"),
        "{\"host\": \"h\", \"user\": \"u\", \"schema\": \"s\"}",
    )
    .unwrap();
    let project = Project::open(temp_dir.path()).unwrap();

    match project.connect() {
        Err(Error::ConfigMalformed(message)) => {
            assert_eq!(message, "\"settings.json\" doesn't contain \"password\" field")
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("connect should fail"),
    }
    assert!(!temp_dir.path().join("app.duckdb").exists());
}

#[test]
fn test_save_settings_writes_file_after_connecting() {
    let temp_dir = TempDir::new().unwrap();
    let project = Project::open(temp_dir.path()).unwrap();
    let settings = Settings::new("localhost", "root", "secret", "app.duckdb").with_driver(Driver::Duckdb);

    let path = project.save_settings(&settings).unwrap();
    assert_eq!(path, temp_dir.path().join("settings.json"));

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], migration_manager_core::config::SETTINGS_HEADER);
    assert_eq!(lines[1], "{");
    assert_eq!(lines[2], "    \"host\": \"localhost\",");
    assert_eq!(lines[3], "    \"user\": \"root\",");
    assert_eq!(lines[4], "    \"password\": \"secret\",");
    assert_eq!(lines[5], "    \"schema\": \"app.duckdb\",");
    assert_eq!(project.settings().unwrap(), settings);
}

#[test]
fn test_save_settings_writes_nothing_when_connection_fails() {
    let temp_dir = TempDir::new().unwrap();
    let project = Project::open(temp_dir.path()).unwrap();
    let settings =
        Settings::new("localhost", "root", "secret", "no/such/dir/app.duckdb").with_driver(Driver::Duckdb);

    assert!(matches!(
        project.save_settings(&settings),
        Err(Error::Connection { .. })
    ));
    assert!(!temp_dir.path().join("settings.json").exists());
    assert!(!temp_dir.path().join("no").exists());
}
