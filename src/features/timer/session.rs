//! Timer session state.
//!
//! A [`TimerSession`] is the single piece of state the work timer owns. It
//! stores only the boundaries needed to derive elapsed time; elapsed time
//! itself is always computed, never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::span_ms;

/// State of the work timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// No session exists
    #[default]
    Idle,
    /// A session is accumulating time
    Running,
    /// A session exists but time is frozen
    Paused,
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

/// The active timer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSession {
    /// Task being timed
    pub subject_id: String,
    /// Identifies this session among all sessions the engine has started
    pub generation: u64,
    /// When the session was first started (ms since epoch)
    pub opened_at: i64,
    /// Most recent start or resume point (ms since epoch)
    pub started_at: i64,
    /// When the session was paused, if it is paused
    pub paused_at: Option<i64>,
    /// Running time from all intervals before the current one
    pub accumulated_ms: u64,
}

impl TimerSession {
    /// Open a fresh running session.
    pub(crate) fn open(subject_id: String, generation: u64, now: i64) -> Self {
        Self {
            subject_id,
            generation,
            opened_at: now,
            started_at: now,
            paused_at: None,
            accumulated_ms: 0,
        }
    }

    /// Whether the session is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Current state (never `Idle`).
    #[must_use]
    pub const fn state(&self) -> TimerState {
        if self.is_paused() {
            TimerState::Paused
        } else {
            TimerState::Running
        }
    }

    /// Elapsed running time as of `now`.
    #[must_use]
    pub fn elapsed_at(&self, now: i64) -> u64 {
        if self.is_paused() {
            self.accumulated_ms
        } else {
            self.accumulated_ms
                .saturating_add(span_ms(self.started_at, now))
        }
    }

    /// Fold the current interval into `accumulated_ms` and freeze.
    pub(crate) fn pause_at(&mut self, now: i64) {
        if self.is_paused() {
            return;
        }
        self.accumulated_ms = self.elapsed_at(now);
        self.paused_at = Some(now);
    }

    /// Begin a new running interval.
    pub(crate) fn resume_at(&mut self, now: i64) {
        if !self.is_paused() {
            return;
        }
        self.started_at = now;
        self.paused_at = None;
    }

    /// End the session, producing the record to persist.
    pub(crate) fn close_at(self, now: i64) -> StoppedSession {
        StoppedSession {
            elapsed_ms: self.elapsed_at(now),
            subject_id: self.subject_id,
            opened_at: self.opened_at,
            ended_at: now.max(self.opened_at),
        }
    }
}

/// A session that has ended.
///
/// This is everything needed to build a time entry; once the engine has
/// cleared its session the duration cannot be recomputed, so callers hold on
/// to this value until it has been saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoppedSession {
    /// Task that was timed
    pub subject_id: String,
    /// When the session was first started (ms since epoch)
    pub opened_at: i64,
    /// When the session ended (ms since epoch)
    pub ended_at: i64,
    /// Running time, excluding pauses
    pub elapsed_ms: u64,
}

impl StoppedSession {
    /// Start time as a UTC timestamp.
    #[must_use]
    pub fn opened_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.opened_at).unwrap_or_default()
    }

    /// End time as a UTC timestamp.
    #[must_use]
    pub fn ended_at_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.ended_at).unwrap_or_default()
    }

    /// Trim the session to at most `limit_ms` of running time.
    ///
    /// The overshoot is taken off the end, which is where it was accrued.
    #[must_use]
    pub fn capped(mut self, limit_ms: u64) -> Self {
        let overshoot = self.elapsed_ms.saturating_sub(limit_ms);
        if overshoot > 0 {
            self.elapsed_ms = limit_ms;
            let overshoot = i64::try_from(overshoot).unwrap_or(i64::MAX);
            self.ended_at = self.ended_at.saturating_sub(overshoot).max(self.opened_at);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capped_trims_end() {
        let stopped = StoppedSession {
            subject_id: "task-1".to_string(),
            opened_at: 0,
            ended_at: 10_000,
            elapsed_ms: 8_000,
        };

        let capped = stopped.clone().capped(6_000);
        assert_eq!(capped.elapsed_ms, 6_000);
        assert_eq!(capped.ended_at, 8_000);

        assert_eq!(stopped.clone().capped(9_000), stopped);
    }

    #[test]
    fn test_open_session_is_running() {
        let session = TimerSession::open("task-1".to_string(), 1, 1_000);
        assert_eq!(session.state(), TimerState::Running);
        assert_eq!(session.opened_at, 1_000);
        assert_eq!(session.started_at, 1_000);
        assert_eq!(session.accumulated_ms, 0);
        assert_eq!(session.elapsed_at(4_000), 3_000);
    }

    #[test]
    fn test_pause_folds_interval() {
        let mut session = TimerSession::open("task-1".to_string(), 1, 0);
        session.pause_at(3_000);

        assert_eq!(session.state(), TimerState::Paused);
        assert_eq!(session.accumulated_ms, 3_000);
        assert_eq!(session.elapsed_at(10_000), 3_000);

        // Second pause is ignored
        session.pause_at(9_000);
        assert_eq!(session.accumulated_ms, 3_000);
        assert_eq!(session.paused_at, Some(3_000));
    }

    #[test]
    fn test_resume_keeps_accumulated() {
        let mut session = TimerSession::open("task-1".to_string(), 1, 0);
        session.pause_at(3_000);
        session.resume_at(10_000);

        assert_eq!(session.state(), TimerState::Running);
        assert_eq!(session.accumulated_ms, 3_000);
        assert_eq!(session.started_at, 10_000);
        assert_eq!(session.opened_at, 0);
        assert_eq!(session.elapsed_at(12_000), 5_000);
    }

    #[test]
    fn test_clock_behind_start_counts_zero() {
        let session = TimerSession::open("task-1".to_string(), 1, 5_000);
        assert_eq!(session.elapsed_at(4_000), 0);
    }

    #[test]
    fn test_close_while_paused() {
        let mut session = TimerSession::open("task-1".to_string(), 1, 0);
        session.pause_at(2_000);
        let stopped = session.close_at(60_000);

        assert_eq!(stopped.subject_id, "task-1");
        assert_eq!(stopped.opened_at, 0);
        assert_eq!(stopped.ended_at, 60_000);
        assert_eq!(stopped.elapsed_ms, 2_000);
    }

    #[test]
    fn test_stopped_session_timestamps() {
        let stopped = StoppedSession {
            subject_id: "t".to_string(),
            opened_at: 1_700_000_000_000,
            ended_at: 1_700_000_060_000,
            elapsed_ms: 60_000,
        };
        let span = stopped.ended_at_utc() - stopped.opened_at_utc();
        assert_eq!(span.num_seconds(), 60);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(TimerState::Idle.to_string(), "Idle");
        assert_eq!(TimerState::Running.to_string(), "Running");
        assert_eq!(TimerState::Paused.to_string(), "Paused");
    }
}
