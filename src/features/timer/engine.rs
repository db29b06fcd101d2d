//! The work timer engine.
//!
//! Owns at most one [`TimerSession`] and implements the transitions between
//! `Idle`, `Running` and `Paused`. All operations are total: calling one in a
//! state where it does not apply is a no-op, never an error.

use tracing::debug;

use super::session::{StoppedSession, TimerSession, TimerState};
use super::view::TimerSnapshot;
use crate::core::{Clock, SystemClock};

/// The single work timer.
#[derive(Debug)]
pub struct TimerEngine<C = SystemClock> {
    clock: C,
    session: Option<TimerSession>,
    next_generation: u64,
}

impl TimerEngine<SystemClock> {
    /// Create an idle engine reading the system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TimerEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimerEngine<C> {
    /// Create an idle engine reading `clock`.
    #[must_use]
    pub const fn with_clock(clock: C) -> Self {
        Self {
            clock,
            session: None,
            next_generation: 1,
        }
    }

    /// The clock this engine reads.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Start timing `subject_id`.
    ///
    /// Any active session (for this or another subject) is stopped first and
    /// returned, so the caller can save it. The result is always a fresh
    /// running session at zero elapsed time.
    pub fn start(&mut self, subject_id: impl Into<String>) -> Option<StoppedSession> {
        let previous = self.finish();
        let now = self.clock.now_ms();
        let generation = self.next_generation;
        self.next_generation += 1;

        let session = TimerSession::open(subject_id.into(), generation, now);
        debug!(subject = %session.subject_id, generation, "timer started");
        self.session = Some(session);

        previous
    }

    /// Freeze elapsed time. No-op when idle or already paused.
    pub fn pause(&mut self) {
        let now = self.clock.now_ms();
        if let Some(session) = self.session.as_mut().filter(|s| !s.is_paused()) {
            session.pause_at(now);
            debug!(
                subject = %session.subject_id,
                accumulated_ms = session.accumulated_ms,
                "timer paused"
            );
        }
    }

    /// Continue a paused session. No-op when idle or running.
    pub fn resume(&mut self) {
        let now = self.clock.now_ms();
        if let Some(session) = self.session.as_mut().filter(|s| s.is_paused()) {
            session.resume_at(now);
            debug!(subject = %session.subject_id, "timer resumed");
        }
    }

    /// Stop the active session and return its elapsed time.
    ///
    /// Returns 0 and leaves the engine untouched when idle.
    pub fn stop(&mut self) -> u64 {
        self.finish().map_or(0, |stopped| stopped.elapsed_ms)
    }

    /// Stop the active session and return the full record of it.
    pub fn finish(&mut self) -> Option<StoppedSession> {
        let session = self.session.take()?;
        let stopped = session.close_at(self.clock.now_ms());
        debug!(
            subject = %stopped.subject_id,
            elapsed_ms = stopped.elapsed_ms,
            "timer stopped"
        );
        Some(stopped)
    }

    /// Elapsed running time of the active session, or 0 when idle.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.session
            .as_ref()
            .map_or(0, |s| s.elapsed_at(self.clock.now_ms()))
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.session.as_ref().map_or(TimerState::Idle, TimerSession::state)
    }

    /// The active session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&TimerSession> {
        self.session.as_ref()
    }

    /// Subject of the active session, if any.
    #[must_use]
    pub fn active_subject(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.subject_id.as_str())
    }

    /// Whether `subject_id` is the subject being timed.
    #[must_use]
    pub fn is_active_for(&self, subject_id: &str) -> bool {
        self.active_subject() == Some(subject_id)
    }

    /// Read everything a presenter needs in one consistent view.
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state(),
            subject_id: self.active_subject().map(str::to_string),
            elapsed_ms: self.elapsed_ms(),
        }
    }

    /// Reinstate a session loaded from storage.
    ///
    /// Replaces any active session without producing a stopped record.
    pub fn restore(&mut self, session: TimerSession) {
        self.next_generation = self.next_generation.max(session.generation + 1);
        debug!(
            subject = %session.subject_id,
            generation = session.generation,
            "timer restored"
        );
        self.session = Some(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;

    fn engine_at(start: i64) -> (TimerEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new(start);
        (TimerEngine::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_new_engine_is_idle() {
        assert_eq!(TimerEngine::new().state(), TimerState::Idle);
        assert_eq!(TimerEngine::default().elapsed_ms(), 0);

        let (engine, _clock) = engine_at(0);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.elapsed_ms(), 0);
        assert!(engine.active_subject().is_none());
    }

    #[test]
    fn test_elapsed_while_running() {
        let (mut engine, clock) = engine_at(0);
        engine.start("task-1");

        clock.set(5_000);
        assert_eq!(engine.elapsed_ms(), 5_000);
        assert_eq!(engine.state(), TimerState::Running);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let (mut engine, clock) = engine_at(0);
        engine.start("task-1");
        clock.set(3_000);
        engine.pause();

        clock.set(10_000);
        assert_eq!(engine.elapsed_ms(), 3_000);
        assert_eq!(engine.state(), TimerState::Paused);
    }

    #[test]
    fn test_resume_continues_from_accumulated() {
        let (mut engine, clock) = engine_at(0);
        engine.start("task-1");
        clock.set(3_000);
        engine.pause();
        clock.set(10_000);
        engine.resume();

        clock.set(12_000);
        assert_eq!(engine.elapsed_ms(), 5_000);
    }

    #[test]
    fn test_stop_then_elapsed_is_zero() {
        let (mut engine, clock) = engine_at(0);
        engine.start("task-1");
        clock.set(7_500);

        assert_eq!(engine.stop(), 7_500);
        assert_eq!(engine.elapsed_ms(), 0);
        assert_eq!(engine.state(), TimerState::Idle);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let (mut engine, _clock) = engine_at(0);
        assert_eq!(engine.stop(), 0);
        assert!(engine.finish().is_none());
        assert_eq!(engine.state(), TimerState::Idle);
    }

    #[test]
    fn test_pause_and_resume_when_idle_are_noops() {
        let (mut engine, _clock) = engine_at(0);
        engine.pause();
        engine.resume();
        assert_eq!(engine.state(), TimerState::Idle);
    }

    #[test]
    fn test_double_pause_matches_single_pause() {
        let (mut once, clock_once) = engine_at(0);
        let (mut twice, clock_twice) = engine_at(0);
        once.start("task-1");
        twice.start("task-1");

        clock_once.set(3_000);
        clock_twice.set(3_000);
        once.pause();
        twice.pause();

        clock_twice.set(4_000);
        twice.pause();

        assert_eq!(once.session(), twice.session());
    }

    #[test]
    fn test_resume_while_running_is_noop() {
        let (mut engine, clock) = engine_at(0);
        engine.start("task-1");
        clock.set(2_000);
        engine.resume();

        let session = engine.session().unwrap();
        assert_eq!(session.started_at, 0);
        assert_eq!(session.accumulated_ms, 0);
    }

    #[test]
    fn test_start_replaces_previous_session() {
        let (mut engine, clock) = engine_at(0);
        engine.start("task-a");
        clock.set(4_000);
        engine.pause();
        clock.set(6_000);

        let previous = engine.start("task-b").unwrap();
        assert_eq!(previous.subject_id, "task-a");
        assert_eq!(previous.elapsed_ms, 4_000);

        assert_eq!(engine.active_subject(), Some("task-b"));
        assert_eq!(engine.elapsed_ms(), 0);
        assert_eq!(engine.session().unwrap().accumulated_ms, 0);

        clock.set(7_000);
        assert_eq!(engine.elapsed_ms(), 1_000);
    }

    #[test]
    fn test_start_twice_equals_stop_then_start() {
        let (mut implicit, clock_a) = engine_at(0);
        let (mut explicit, clock_b) = engine_at(0);

        implicit.start("task-a");
        explicit.start("task-a");
        clock_a.set(9_000);
        clock_b.set(9_000);

        implicit.start("task-b");
        explicit.stop();
        explicit.start("task-b");

        clock_a.set(11_000);
        clock_b.set(11_000);
        assert_eq!(implicit.elapsed_ms(), explicit.elapsed_ms());
        assert_eq!(implicit.state(), explicit.state());
        assert_eq!(implicit.active_subject(), explicit.active_subject());
    }

    #[test]
    fn test_restart_same_subject_is_new_generation() {
        let (mut engine, _clock) = engine_at(0);
        engine.start("task-1");
        let first = engine.session().unwrap().generation;
        engine.start("task-1");
        let second = engine.session().unwrap().generation;
        assert!(second > first);
    }

    #[test]
    fn test_elapsed_monotonic_while_running() {
        let (mut engine, clock) = engine_at(0);
        engine.start("task-1");

        let mut last = 0;
        for step in [10, 250, 1_000, 0, 5] {
            clock.advance(step);
            let now = engine.elapsed_ms();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_backwards_clock_step_floors_at_accumulated() {
        let (mut engine, clock) = engine_at(0);
        engine.start("task-1");
        clock.set(5_000);
        assert_eq!(engine.elapsed_ms(), 5_000);

        // The running interval shrinks with the clock
        clock.set(2_000);
        assert_eq!(engine.elapsed_ms(), 2_000);

        // but never below zero
        clock.set(-1_000);
        assert_eq!(engine.elapsed_ms(), 0);

        clock.set(3_000);
        engine.pause();
        clock.set(4_000);
        engine.resume();

        // Time banked at the pause is kept
        clock.set(3_500);
        assert_eq!(engine.elapsed_ms(), 3_000);
    }

    #[test]
    fn test_restore_session() {
        let (mut engine, clock) = engine_at(50_000);
        let session = TimerSession {
            subject_id: "task-9".to_string(),
            generation: 7,
            opened_at: 0,
            started_at: 40_000,
            paused_at: None,
            accumulated_ms: 20_000,
        };
        engine.restore(session);

        assert_eq!(engine.elapsed_ms(), 30_000);
        clock.advance(1_000);
        assert_eq!(engine.elapsed_ms(), 31_000);

        engine.start("task-10");
        assert_eq!(engine.session().unwrap().generation, 8);
    }

    #[test]
    fn test_snapshot() {
        let (mut engine, clock) = engine_at(0);
        assert_eq!(engine.snapshot(), TimerSnapshot::default());

        engine.start("task-1");
        clock.set(1_500);
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.state, TimerState::Running);
        assert_eq!(snapshot.subject_id.as_deref(), Some("task-1"));
        assert_eq!(snapshot.elapsed_ms, 1_500);
        assert!(engine.is_active_for("task-1"));
        assert!(!engine.is_active_for("task-2"));
    }
}
