//! JSON output formatting for docket.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::DocketError;
use crate::features::timer::{RetryReport, StopOutcome, TimerSnapshot};
use crate::storage::{NewTimeEntry, TimeEntry};

fn outcome_value(outcome: &StopOutcome) -> Value {
    json!({
        "subject_id": outcome.stopped.subject_id,
        "elapsed_ms": outcome.stopped.elapsed_ms,
        "entry_id": outcome.entry_id,
        "entry": outcome.entry,
    })
}

/// Format the result of `start` as JSON.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_started_json(
    snapshot: &TimerSnapshot,
    previous: Option<&StopOutcome>,
) -> Result<String, DocketError> {
    let output = json!({
        "timer": snapshot,
        "previous": previous.map(outcome_value),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the result of `stop` as JSON.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_stopped_json(outcome: Option<&StopOutcome>) -> Result<String, DocketError> {
    let output = json!({
        "stopped": outcome.map(outcome_value),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format time entries as JSON.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_entries_json(entries: &[TimeEntry], title: &str) -> Result<String, DocketError> {
    let output = json!({
        "list": title,
        "count": entries.len(),
        "total_minutes": entries.iter().map(|e| e.entry.duration_minutes).sum::<i64>(),
        "items": entries,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format unsaved entries as JSON.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_unsaved_json(entries: &[NewTimeEntry], title: &str) -> Result<String, DocketError> {
    let output = json!({
        "list": title,
        "count": entries.len(),
        "items": entries,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a retry report as JSON.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn format_retry_json(report: &RetryReport) -> Result<String, DocketError> {
    let output = json!({
        "saved": report.saved,
        "remaining": report.remaining,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, DocketError> {
    Ok(serde_json::to_string_pretty(value)?)
}
