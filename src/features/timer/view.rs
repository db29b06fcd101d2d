//! What presenters read from the timer.
//!
//! Each presenter (task row, detail panel, status bar) takes one
//! [`TimerSnapshot`] per frame and decides which [`Controls`] to offer for the
//! task it is showing. Since every presenter reads the same engine, they all
//! agree after at most one redraw.

use serde::{Deserialize, Serialize};

use super::format::format_clock;
use super::session::TimerState;

/// A point-in-time view of the timer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Current state
    pub state: TimerState,
    /// Subject being timed, if any
    pub subject_id: Option<String>,
    /// Elapsed running time in milliseconds
    pub elapsed_ms: u64,
}

impl TimerSnapshot {
    /// Whether `subject_id` is the subject being timed.
    #[must_use]
    pub fn is_for(&self, subject_id: &str) -> bool {
        self.subject_id.as_deref() == Some(subject_id)
    }

    /// Elapsed time as `HH:MM:SS`.
    #[must_use]
    pub fn clock(&self) -> String {
        format_clock(self.elapsed_ms)
    }
}

/// Which timer actions a presenter offers for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controls {
    /// The task is not being timed
    Start,
    /// The task is being timed and running
    PauseOrStop,
    /// The task is being timed and paused
    ResumeOrStop,
}

impl Controls {
    /// Controls for `subject_id` given the current snapshot.
    #[must_use]
    pub fn for_subject(snapshot: &TimerSnapshot, subject_id: &str) -> Self {
        if !snapshot.is_for(subject_id) {
            return Self::Start;
        }
        match snapshot.state {
            TimerState::Running => Self::PauseOrStop,
            TimerState::Paused => Self::ResumeOrStop,
            TimerState::Idle => Self::Start,
        }
    }

    /// Short labels for the offered actions.
    #[must_use]
    pub const fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Start => &["start"],
            Self::PauseOrStop => &["pause", "stop"],
            Self::ResumeOrStop => &["resume", "stop"],
        }
    }

    /// Icon shown next to a task.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Start => "○",
            Self::PauseOrStop => "▶",
            Self::ResumeOrStop => "⏸",
        }
    }
}
