//! Error types for docket.

use thiserror::Error;

/// Errors that can occur in docket.
///
/// Timer transitions never fail; every variant here comes from the
/// collaborators around the engine (configuration, storage, output).
#[derive(Debug, Error)]
pub enum DocketError {
    /// Configuration could not be read, parsed, or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// A database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Filesystem or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The command cannot run as given.
    #[error("{0}")]
    Usage(String),

    /// Serialization or deserialization failed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A stopped session could not be saved as a time entry.
    ///
    /// The entry is kept in the unsaved queue and can be retried.
    #[error("could not save {minutes} min for {subject_id}: {reason} (kept for retry)")]
    Persistence {
        /// Subject the entry belongs to.
        subject_id: String,
        /// Billable minutes that were not saved.
        minutes: i64,
        /// Underlying failure.
        reason: String,
    },
}

impl From<serde_json::Error> for DocketError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl DocketError {
    /// Whether the failure left work waiting in the unsaved queue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_error_message() {
        let err = DocketError::Persistence {
            subject_id: "task-1".to_string(),
            minutes: 42,
            reason: "disk full".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("42 min"));
        assert!(msg.contains("task-1"));
        assert!(msg.contains("kept for retry"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_json_error_converts_to_parse() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: DocketError = json_err.into();
        assert!(matches!(err, DocketError::Parse(_)));
        assert!(!err.is_recoverable());
    }
}
