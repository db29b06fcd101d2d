//! Entries waiting to be saved.
//!
//! When a time entry cannot be written to the database the computed duration
//! must not be lost. Unsaved entries are kept in `~/.docket/pending.json`,
//! outside the database, until `docket retry` saves them or
//! `docket discard` drops them.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::NewTimeEntry;
use crate::error::DocketError;

/// A JSON file of unsaved time entries.
#[derive(Debug, Clone)]
pub struct PendingQueue {
    path: PathBuf,
}

impl PendingQueue {
    /// Use the queue file at `path`.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the queue file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load queued entries. A missing file is an empty queue.
    pub fn load(&self) -> Result<Vec<NewTimeEntry>, DocketError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Replace the queue contents. An empty slice removes the file.
    pub fn store(&self, entries: &[NewTimeEntry]) -> Result<(), DocketError> {
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        let dir = self.path.parent().ok_or_else(|| {
            DocketError::Config(format!("No parent directory for {}", self.path.display()))
        })?;
        fs::create_dir_all(dir)?;

        let contents = serde_json::to_string_pretty(entries)?;
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| DocketError::Io(e.error))?;

        debug!(count = entries.len(), path = %self.path.display(), "pending entries stored");
        Ok(())
    }
}
