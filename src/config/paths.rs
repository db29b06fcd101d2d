//! Path resolution for docket configuration and data files.
//!
//! All docket data is stored in `~/.docket/`:
//! - `config.yaml` - Main configuration file
//! - `docket.db` - SQLite database for time entries and the live timer
//! - `pending.json` - Time entries that could not be saved yet

use std::path::PathBuf;

use crate::error::DocketError;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "DOCKET_HOME";

/// Paths to docket configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.docket/`
    pub root: PathBuf,
    /// Config file: `~/.docket/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.docket/docket.db`
    pub database: PathBuf,
    /// Unsaved entries: `~/.docket/pending.json`
    pub pending: PathBuf,
}

impl Paths {
    /// Resolve paths from `$DOCKET_HOME`, falling back to `~/.docket`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, DocketError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME")
            .map_err(|_| DocketError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".docket")))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("docket.db"),
            pending: root.join("pending.json"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), DocketError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                DocketError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}
