//! `SQLite` database connection.
//!
//! The database is stored at `~/.docket/docket.db` and contains tables for:
//! - Time entries
//! - The live timer snapshot

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use crate::error::DocketError;

use super::migrations;

/// How long to wait on a lock held by another docket process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database file at `path`, creating it and running
    /// migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &Path) -> Result<Self, DocketError> {
        let conn = Connection::open(path).map_err(|e| {
            DocketError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "database opened");
        Self::prepare(conn)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, DocketError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            DocketError::Database(format!("Failed to open in-memory database: {e}"))
        })?;
        Self::prepare(conn)
    }

    fn prepare(conn: Connection) -> Result<Self, DocketError> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| DocketError::Database(format!("Failed to set busy timeout: {e}")))?;

        let db = Self { conn };
        migrations::run(&db.conn)?;
        Ok(db)
    }

    /// Get a reference to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
