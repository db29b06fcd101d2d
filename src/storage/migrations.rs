//! Database migrations for docket.
//!
//! Each migration upgrades the schema by one version. Migrations run
//! automatically when the database is opened.

use rusqlite::Connection;
use tracing::info;

use crate::error::DocketError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 for a new database.
pub fn get_version(conn: &Connection) -> Result<i32, DocketError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| DocketError::Database(format!("Failed to get schema version: {e}")))
}

fn set_version(conn: &Connection, version: i32) -> Result<(), DocketError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| DocketError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), DocketError> {
    let current = get_version(conn)?;

    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
        info!(version, "applied schema migration");
    }

    Ok(())
}

fn run_migration(conn: &Connection, version: i32) -> Result<(), DocketError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(DocketError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: Initial schema.
///
/// Creates tables for:
/// - `time_entries`: saved work sessions
/// - `timer_state`: the live session (at most one row)
fn migrate_v1(conn: &Connection) -> Result<(), DocketError> {
    conn.execute_batch(
        r"
        CREATE TABLE IF NOT EXISTS time_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id TEXT NOT NULL,
            start_timestamp TEXT NOT NULL,
            end_timestamp TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            is_billable INTEGER NOT NULL DEFAULT 1,
            description TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_time_entries_subject
        ON time_entries(subject_id);

        CREATE INDEX IF NOT EXISTS idx_time_entries_start
        ON time_entries(start_timestamp);

        CREATE TABLE IF NOT EXISTS timer_state (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            subject_id TEXT NOT NULL,
            generation INTEGER NOT NULL,
            opened_at INTEGER NOT NULL,
            started_at INTEGER NOT NULL,
            paused_at INTEGER,
            accumulated_ms INTEGER NOT NULL DEFAULT 0,
            warned INTEGER NOT NULL DEFAULT 0
        );
        ",
    )
    .map_err(|e| DocketError::Database(format!("Migration v1 failed: {e}")))
}
