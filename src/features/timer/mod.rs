//! The work timer.
//!
//! One session at a time, measured in milliseconds of running time. The
//! [`TimerEngine`] owns the state machine, [`AutoStopPolicy`] enforces the
//! long-session warning and hard limit, and [`TimerService`] saves stopped
//! sessions and reports what happened.

mod engine;
mod format;
mod policy;
mod service;
mod session;
mod view;

pub use engine::TimerEngine;
pub use format::{billable_minutes, format_clock, format_duration, format_minutes_short, render_progress_bar};
pub use policy::{AutoStopPolicy, PolicyEvent, HARD_LIMIT_MS, WARNING_THRESHOLD_MS};
pub use service::{EntryDefaults, RetryReport, StopOptions, StopOutcome, TimerService};
pub use session::{StoppedSession, TimerSession, TimerState};
pub use view::{Controls, TimerSnapshot};
