//! Warning and auto-stop guardrails.
//!
//! A session that runs too long is almost always a forgotten timer. The
//! policy warns once when a session passes [`WARNING_THRESHOLD_MS`] and stops
//! it when it reaches [`HARD_LIMIT_MS`].

use tracing::warn;

use super::engine::TimerEngine;
use super::session::StoppedSession;
use crate::core::Clock;

/// Elapsed time at which the warning fires (5 hours).
pub const WARNING_THRESHOLD_MS: u64 = 5 * 60 * 60 * 1_000;

/// Elapsed time at which the session is stopped (6 hours).
pub const HARD_LIMIT_MS: u64 = 6 * 60 * 60 * 1_000;

/// Something the policy did that the user must be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyEvent {
    /// The session passed the warning threshold.
    Warning {
        /// Subject being timed
        subject_id: String,
        /// Elapsed time when the warning fired
        elapsed_ms: u64,
    },
    /// The session reached the hard limit and was stopped.
    AutoStopped(StoppedSession),
}

/// Tracks which session has already been warned.
#[derive(Debug, Clone)]
pub struct AutoStopPolicy {
    warning_ms: u64,
    limit_ms: u64,
    warned_generation: Option<u64>,
}

impl Default for AutoStopPolicy {
    fn default() -> Self {
        Self::with_thresholds(WARNING_THRESHOLD_MS, HARD_LIMIT_MS)
    }
}

impl AutoStopPolicy {
    const fn with_thresholds(warning_ms: u64, limit_ms: u64) -> Self {
        Self {
            warning_ms,
            limit_ms,
            warned_generation: None,
        }
    }

    /// The hard limit in milliseconds.
    #[must_use]
    pub const fn limit_ms(&self) -> u64 {
        self.limit_ms
    }

    /// Generation of the session that has been warned, if any.
    #[must_use]
    pub const fn warned_generation(&self) -> Option<u64> {
        self.warned_generation
    }

    /// Record that the session with `generation` was already warned.
    ///
    /// Used when the timer is reloaded from storage.
    pub fn mark_warned(&mut self, generation: u64) {
        self.warned_generation = Some(generation);
    }

    /// Check the engine against the thresholds.
    ///
    /// Fires the warning at most once per session and the auto-stop at most
    /// once, since a stopped engine is idle and never matches again.
    pub fn check<C: Clock>(&mut self, engine: &mut TimerEngine<C>) -> Option<PolicyEvent> {
        let generation = engine.session()?.generation;
        let elapsed_ms = engine.elapsed_ms();

        if elapsed_ms >= self.limit_ms {
            let stopped = engine.finish()?.capped(self.limit_ms);
            warn!(
                subject = %stopped.subject_id,
                elapsed_ms = stopped.elapsed_ms,
                "timer reached hard limit, stopped automatically"
            );
            self.warned_generation = None;
            return Some(PolicyEvent::AutoStopped(stopped));
        }

        if elapsed_ms >= self.warning_ms && self.warned_generation != Some(generation) {
            self.warned_generation = Some(generation);
            let subject_id = engine.active_subject().unwrap_or_default().to_string();
            warn!(subject = %subject_id, elapsed_ms, "timer passed warning threshold");
            return Some(PolicyEvent::Warning {
                subject_id,
                elapsed_ms,
            });
        }

        None
    }

    /// Fraction of the hard limit used by `elapsed_ms` (0.0 to 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self, elapsed_ms: u64) -> f64 {
        if self.limit_ms == 0 {
            return 1.0;
        }
        (elapsed_ms as f64 / self.limit_ms as f64).min(1.0)
    }
}
