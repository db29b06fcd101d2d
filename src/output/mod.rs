//! Output formatting for docket.
//!
//! Every command result can be shown as colored text or as JSON.

mod json;
mod pretty;

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::DocketError;
use crate::features::timer::{RetryReport, StopOutcome, TimerSnapshot};
use crate::storage::{NewTimeEntry, TimeEntry};

pub use json::*;
pub use pretty::*;

/// Everything `docket status` reports.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// The timer
    #[serde(flatten)]
    pub timer: TimerSnapshot,
    /// Elapsed time as `HH:MM:SS`
    pub clock: String,
    /// Fraction of the hard limit used
    pub progress: f64,
    /// Whether the long-session warning was shown
    pub warned: bool,
    /// Entries waiting for `docket retry`
    pub unsaved: usize,
}

/// Format the timer status.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_status(report: &StatusReport, format: OutputFormat) -> Result<String, DocketError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(report)),
        OutputFormat::Json => to_json(report),
    }
}

/// Format the result of `start`.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_started(
    snapshot: &TimerSnapshot,
    previous: Option<&StopOutcome>,
    format: OutputFormat,
) -> Result<String, DocketError> {
    match format {
        OutputFormat::Pretty => Ok(format_started_pretty(snapshot, previous)),
        OutputFormat::Json => format_started_json(snapshot, previous),
    }
}

/// Format the timer after `pause` or `resume`.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_snapshot(snapshot: &TimerSnapshot, format: OutputFormat) -> Result<String, DocketError> {
    match format {
        OutputFormat::Pretty => Ok(format_snapshot_pretty(snapshot)),
        OutputFormat::Json => to_json(snapshot),
    }
}

/// Format the result of `stop`.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_stopped(outcome: Option<&StopOutcome>, format: OutputFormat) -> Result<String, DocketError> {
    match format {
        OutputFormat::Pretty => Ok(format_stopped_pretty(outcome)),
        OutputFormat::Json => format_stopped_json(outcome),
    }
}

/// Format saved time entries.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_entries(entries: &[TimeEntry], title: &str, format: OutputFormat) -> Result<String, DocketError> {
    match format {
        OutputFormat::Pretty => Ok(format_entries_pretty(entries, title)),
        OutputFormat::Json => format_entries_json(entries, title),
    }
}

/// Format unsaved time entries.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_unsaved(entries: &[NewTimeEntry], title: &str, format: OutputFormat) -> Result<String, DocketError> {
    match format {
        OutputFormat::Pretty => Ok(format_unsaved_pretty(entries, title)),
        OutputFormat::Json => format_unsaved_json(entries, title),
    }
}

/// Format the result of `retry`.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_retry(report: &RetryReport, format: OutputFormat) -> Result<String, DocketError> {
    match format {
        OutputFormat::Pretty => Ok(format_retry_pretty(report)),
        OutputFormat::Json => format_retry_json(report),
    }
}
