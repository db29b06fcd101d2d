//! Live timer snapshot.
//!
//! Every `docket` invocation is a separate process, so the one timer session
//! lives in the database between commands. The `timer_state` table holds at
//! most one row; no row means the timer is idle.

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::Database;
use crate::error::DocketError;
use crate::features::timer::TimerSession;

/// A timer session as it was last saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTimer {
    /// The session
    pub session: TimerSession,
    /// Whether the long-session warning was already shown
    pub warned: bool,
}

/// Storage for the live timer session.
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    /// Create the store with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Load the saved session, if the timer was not idle.
    pub fn load(&self) -> Result<Option<StoredTimer>, DocketError> {
        self.db
            .connection()
            .query_row(
                r"SELECT subject_id, generation, opened_at, started_at,
                         paused_at, accumulated_ms, warned
                  FROM timer_state WHERE id = 1",
                [],
                row_to_stored,
            )
            .optional()
            .map_err(|e| DocketError::Database(format!("Failed to load timer state: {e}")))
    }

    /// Save the current session, or clear it when `session` is `None`.
    pub fn save(&self, session: Option<&TimerSession>, warned: bool) -> Result<(), DocketError> {
        let Some(session) = session else {
            return self.clear();
        };

        let accumulated = i64::try_from(session.accumulated_ms).unwrap_or(i64::MAX);
        let generation = i64::try_from(session.generation).unwrap_or(i64::MAX);

        self.db
            .connection()
            .execute(
                r"INSERT OR REPLACE INTO timer_state
                  (id, subject_id, generation, opened_at, started_at, paused_at, accumulated_ms, warned)
                  VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    session.subject_id,
                    generation,
                    session.opened_at,
                    session.started_at,
                    session.paused_at,
                    accumulated,
                    warned,
                ],
            )
            .map_err(|e| DocketError::Database(format!("Failed to save timer state: {e}")))?;

        debug!(subject = %session.subject_id, "timer state saved");
        Ok(())
    }

    /// Remove the saved session.
    pub fn clear(&self) -> Result<(), DocketError> {
        self.db
            .connection()
            .execute("DELETE FROM timer_state", [])
            .map_err(|e| DocketError::Database(format!("Failed to clear timer state: {e}")))?;
        Ok(())
    }
}

fn row_to_stored(row: &Row<'_>) -> Result<StoredTimer, rusqlite::Error> {
    let generation: i64 = row.get(1)?;
    let accumulated: i64 = row.get(5)?;

    Ok(StoredTimer {
        session: TimerSession {
            subject_id: row.get(0)?,
            generation: u64::try_from(generation).unwrap_or(0),
            opened_at: row.get(2)?,
            started_at: row.get(3)?,
            paused_at: row.get(4)?,
            accumulated_ms: u64::try_from(accumulated).unwrap_or(0),
        },
        warned: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SessionStore {
        SessionStore::with_database(Database::open_in_memory().unwrap())
    }

    fn session(paused_at: Option<i64>) -> TimerSession {
        TimerSession {
            subject_id: "task-1".to_string(),
            generation: 3,
            opened_at: 1_000,
            started_at: 5_000,
            paused_at,
            accumulated_ms: 2_500,
        }
    }

    #[test]
    fn test_empty_store_is_idle() {
        let store = create_test_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let store = create_test_store();
        let running = session(None);
        store.save(Some(&running), false).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.session, running);
        assert!(!loaded.warned);
    }

    #[test]
    fn test_save_overwrites() {
        let store = create_test_store();
        store.save(Some(&session(None)), false).unwrap();

        let paused = session(Some(9_000));
        store.save(Some(&paused), true).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.session.paused_at, Some(9_000));
        assert!(loaded.warned);
    }

    #[test]
    fn test_save_none_clears() {
        let store = create_test_store();
        store.save(Some(&session(None)), false).unwrap();
        store.save(None, false).unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
