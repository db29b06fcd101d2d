//! Time entry storage.
//!
//! A time entry is the durable record of a stopped timer session. The timer
//! service only depends on [`TimeEntrySink`]; [`TimeEntryStorage`] is the
//! `SQLite` implementation.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Database;
use crate::error::DocketError;

/// A time entry that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeEntry {
    /// Task the time was spent on
    pub subject_id: String,
    /// When the session was first started
    pub start_timestamp: DateTime<Utc>,
    /// When the session was stopped
    pub end_timestamp: DateTime<Utc>,
    /// Billable minutes, rounded up to the billing increment
    pub duration_minutes: i64,
    /// Whether the entry is billable
    pub is_billable: bool,
    /// Optional note
    pub description: Option<String>,
}

/// A saved time entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Database ID
    pub id: i64,
    /// The saved fields
    #[serde(flatten)]
    pub entry: NewTimeEntry,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Somewhere stopped sessions can be saved.
#[cfg_attr(test, mockall::automock)]
pub trait TimeEntrySink {
    /// Save `entry` and return the id of the created record.
    fn create(&self, entry: &NewTimeEntry) -> Result<i64, DocketError>;
}

/// `SQLite`-backed time entries.
pub struct TimeEntryStorage {
    db: Database,
}

const SELECT_COLUMNS: &str = r"SELECT id, subject_id, start_timestamp, end_timestamp,
       duration_minutes, is_billable, description, created_at
  FROM time_entries";

impl TimeEntryStorage {
    /// Create storage with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Get an entry by ID.
    pub fn get(&self, id: i64) -> Result<Option<TimeEntry>, DocketError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        self.db
            .connection()
            .query_row(&sql, [id], row_to_entry)
            .optional()
            .map_err(|e| DocketError::Database(format!("Failed to query entry: {e}")))
    }

    /// Most recently started entries, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<TimeEntry>, DocketError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY start_timestamp DESC, id DESC LIMIT ?1");
        self.query_list(&sql, params![limit])
    }

    /// Entries for one subject, newest first.
    pub fn by_subject(&self, subject_id: &str, limit: usize) -> Result<Vec<TimeEntry>, DocketError> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE subject_id = ?1 ORDER BY start_timestamp DESC, id DESC LIMIT ?2"
        );
        self.query_list(&sql, params![subject_id, limit])
    }

    /// Subjects with saved entries, most recently worked first.
    pub fn subjects(&self, limit: usize) -> Result<Vec<String>, DocketError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                r"SELECT subject_id FROM time_entries
                  GROUP BY subject_id
                  ORDER BY MAX(start_timestamp) DESC
                  LIMIT ?1",
            )
            .map_err(|e| DocketError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([limit], |row| row.get(0))
            .map_err(|e| DocketError::Database(format!("Failed to query subjects: {e}")))?;

        rows.collect::<Result<Vec<String>, _>>()
            .map_err(|e| DocketError::Database(e.to_string()))
    }

    /// Total minutes recorded for a subject.
    pub fn total_minutes(&self, subject_id: &str) -> Result<i64, DocketError> {
        self.db
            .connection()
            .query_row(
                "SELECT COALESCE(SUM(duration_minutes), 0) FROM time_entries WHERE subject_id = ?1",
                [subject_id],
                |row| row.get(0),
            )
            .map_err(|e| DocketError::Database(format!("Failed to query total time: {e}")))
    }

    fn query_list(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<TimeEntry>, DocketError> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DocketError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, row_to_entry)
            .map_err(|e| DocketError::Database(format!("Failed to query entries: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DocketError::Database(e.to_string()))
    }
}

impl TimeEntrySink for TimeEntryStorage {
    fn create(&self, entry: &NewTimeEntry) -> Result<i64, DocketError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO time_entries
              (subject_id, start_timestamp, end_timestamp, duration_minutes, is_billable, description, created_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.subject_id,
                entry.start_timestamp.to_rfc3339(),
                entry.end_timestamp.to_rfc3339(),
                entry.duration_minutes,
                entry.is_billable,
                entry.description,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| DocketError::Database(format!("Failed to insert time entry: {e}")))?;

        let id = conn.last_insert_rowid();
        info!(
            id,
            subject = %entry.subject_id,
            minutes = entry.duration_minutes,
            "time entry saved"
        );
        Ok(id)
    }
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Convert a database row to a `TimeEntry`.
fn row_to_entry(row: &Row<'_>) -> Result<TimeEntry, rusqlite::Error> {
    Ok(TimeEntry {
        id: row.get(0)?,
        entry: NewTimeEntry {
            subject_id: row.get(1)?,
            start_timestamp: parse_timestamp(row, 2)?,
            end_timestamp: parse_timestamp(row, 3)?,
            duration_minutes: row.get(4)?,
            is_billable: row.get(5)?,
            description: row.get(6)?,
        },
        created_at: parse_timestamp(row, 7)?,
    })
}
