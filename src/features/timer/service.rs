//! The timer service.
//!
//! Wires the engine and the auto-stop policy to the two collaborators: the
//! time-entry sink that stopped sessions are saved to, and the notifier that
//! tells the user about warnings, auto-stops and failed saves.
//!
//! A stopped session's duration cannot be recomputed once the engine has
//! cleared it, so the service builds the time entry before it touches the
//! sink and keeps every entry that fails to save in an unsaved queue.

use tracing::warn;

use super::engine::TimerEngine;
use super::format::{billable_minutes, format_duration};
use super::policy::{AutoStopPolicy, PolicyEvent};
use super::session::{StoppedSession, TimerState};
use super::view::TimerSnapshot;
use crate::config::TimerConfig;
use crate::core::{Clock, SystemClock};
use crate::error::DocketError;
use crate::notify::{Notice, NoticeKind, Notifier};
use crate::storage::{NewTimeEntry, StoredTimer, TimeEntrySink};

/// How stopped sessions become time entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDefaults {
    /// Whether entries are billable unless stated otherwise
    pub billable: bool,
    /// Minutes entries are rounded up to
    pub increment_minutes: u32,
}

impl Default for EntryDefaults {
    fn default() -> Self {
        Self {
            billable: true,
            increment_minutes: 1,
        }
    }
}

impl From<&TimerConfig> for EntryDefaults {
    fn from(config: &TimerConfig) -> Self {
        Self {
            billable: config.billable_by_default,
            increment_minutes: config.billing_increment_minutes,
        }
    }
}

/// Per-stop overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopOptions {
    /// Note saved with the entry
    pub description: Option<String>,
    /// Overrides [`EntryDefaults::billable`]
    pub billable: Option<bool>,
}

/// Result of ending a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopOutcome {
    /// The session that ended
    pub stopped: StoppedSession,
    /// The entry built from it
    pub entry: NewTimeEntry,
    /// ID of the saved entry; `None` when nothing was worth saving
    pub entry_id: Option<i64>,
}

/// Result of retrying unsaved entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryReport {
    /// IDs of entries saved by this retry
    pub saved: Vec<i64>,
    /// Entries still unsaved
    pub remaining: usize,
}

/// The work timer with its collaborators.
pub struct TimerService<S, N, C = SystemClock> {
    engine: TimerEngine<C>,
    policy: AutoStopPolicy,
    sink: S,
    notifier: N,
    defaults: EntryDefaults,
    unsaved: Vec<NewTimeEntry>,
}

impl<S: TimeEntrySink, N: Notifier, C: Clock> TimerService<S, N, C> {
    /// Create a service around an existing engine.
    #[must_use]
    pub fn with_engine(engine: TimerEngine<C>, sink: S, notifier: N) -> Self {
        Self {
            engine,
            policy: AutoStopPolicy::default(),
            sink,
            notifier,
            defaults: EntryDefaults::default(),
            unsaved: Vec::new(),
        }
    }

    /// Replace the entry defaults.
    #[must_use]
    pub fn with_defaults(mut self, defaults: EntryDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// The engine, for read-only access.
    #[must_use]
    pub const fn engine(&self) -> &TimerEngine<C> {
        &self.engine
    }

    /// The auto-stop policy.
    #[must_use]
    pub const fn policy(&self) -> &AutoStopPolicy {
        &self.policy
    }

    /// The time-entry sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// What presenters should show right now.
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    /// Elapsed time of the active session.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.engine.elapsed_ms()
    }

    /// Whether the active session has already been warned.
    #[must_use]
    pub fn is_warned(&self) -> bool {
        self.engine
            .session()
            .is_some_and(|s| self.policy.warned_generation() == Some(s.generation))
    }

    /// Reinstate a saved session.
    pub fn restore(&mut self, stored: StoredTimer) {
        let generation = stored.session.generation;
        self.engine.restore(stored.session);
        if stored.warned {
            self.policy.mark_warned(generation);
        }
    }

    /// Start timing `subject_id`.
    ///
    /// An active session is stopped and saved first. If that save fails the
    /// error is returned, but the new session is already running and the
    /// previous entry is in the unsaved queue.
    pub fn start(&mut self, subject_id: impl Into<String>) -> Result<Option<StopOutcome>, DocketError> {
        match self.engine.start(subject_id) {
            Some(previous) => self.record(previous, StopOptions::default()).map(Some),
            None => Ok(None),
        }
    }

    /// Pause the active session.
    pub fn pause(&mut self) {
        self.engine.pause();
    }

    /// Resume a paused session.
    pub fn resume(&mut self) {
        self.engine.resume();
    }

    /// Stop the active session and save it. `Ok(None)` when idle.
    pub fn stop(&mut self) -> Result<Option<StopOutcome>, DocketError> {
        self.stop_with(StopOptions::default())
    }

    /// Stop the active session and save it with `options`.
    pub fn stop_with(&mut self, options: StopOptions) -> Result<Option<StopOutcome>, DocketError> {
        match self.engine.finish() {
            Some(stopped) => self.record(stopped, options).map(Some),
            None => Ok(None),
        }
    }

    /// Run the auto-stop policy.
    ///
    /// Call this on the display cadence. A warning or auto-stop is reported
    /// through the notifier and returned. If an auto-stopped session cannot be
    /// saved, the save error is returned instead; the user has already been
    /// told about both.
    pub fn tick(&mut self) -> Result<Option<PolicyEvent>, DocketError> {
        let event = self.policy.check(&mut self.engine);

        match &event {
            Some(PolicyEvent::Warning {
                subject_id,
                elapsed_ms,
            }) => {
                self.notifier.notify(&Notice::new(
                    NoticeKind::Warning,
                    Some(subject_id.as_str()),
                    format!(
                        "{subject_id} has been timed for {}; it stops automatically at {}",
                        format_duration(*elapsed_ms),
                        format_duration(self.policy.limit_ms())
                    ),
                ));
            }
            Some(PolicyEvent::AutoStopped(stopped)) => {
                self.notifier.notify(&Notice::new(
                    NoticeKind::AutoStopped,
                    Some(stopped.subject_id.as_str()),
                    format!(
                        "{} was stopped automatically after {}",
                        stopped.subject_id,
                        format_duration(stopped.elapsed_ms)
                    ),
                ));
                self.record(stopped.clone(), StopOptions::default())?;
            }
            None => {}
        }

        Ok(event)
    }

    /// Build the time entry for a stopped session.
    #[must_use]
    pub fn entry_for(&self, stopped: &StoppedSession, options: &StopOptions) -> NewTimeEntry {
        NewTimeEntry {
            subject_id: stopped.subject_id.clone(),
            start_timestamp: stopped.opened_at_utc(),
            end_timestamp: stopped.ended_at_utc(),
            duration_minutes: billable_minutes(stopped.elapsed_ms, self.defaults.increment_minutes),
            is_billable: options.billable.unwrap_or(self.defaults.billable),
            description: options.description.clone(),
        }
    }

    /// Entries that could not be saved.
    #[must_use]
    pub fn unsaved(&self) -> &[NewTimeEntry] {
        &self.unsaved
    }

    /// Add entries to the unsaved queue (e.g. loaded from disk).
    pub fn queue_unsaved(&mut self, entries: impl IntoIterator<Item = NewTimeEntry>) {
        self.unsaved.extend(entries);
    }

    /// Try once to save every unsaved entry.
    pub fn retry_unsaved(&mut self) -> RetryReport {
        let pending = std::mem::take(&mut self.unsaved);
        let mut report = RetryReport::default();

        for entry in pending {
            match self.sink.create(&entry) {
                Ok(id) => report.saved.push(id),
                Err(e) => {
                    warn!(subject = %entry.subject_id, error = %e, "retry failed");
                    self.unsaved.push(entry);
                }
            }
        }

        report.remaining = self.unsaved.len();
        report
    }

    /// Drop every unsaved entry, returning them.
    pub fn discard_unsaved(&mut self) -> Vec<NewTimeEntry> {
        std::mem::take(&mut self.unsaved)
    }

    fn record(&mut self, stopped: StoppedSession, options: StopOptions) -> Result<StopOutcome, DocketError> {
        let entry = self.entry_for(&stopped, &options);

        if stopped.elapsed_ms == 0 {
            return Ok(StopOutcome {
                stopped,
                entry,
                entry_id: None,
            });
        }

        match self.sink.create(&entry) {
            Ok(id) => Ok(StopOutcome {
                stopped,
                entry,
                entry_id: Some(id),
            }),
            Err(e) => {
                warn!(
                    subject = %entry.subject_id,
                    minutes = entry.duration_minutes,
                    error = %e,
                    "time entry not saved, queued for retry"
                );
                self.notifier.notify(&Notice::new(
                    NoticeKind::Error,
                    Some(entry.subject_id.as_str()),
                    format!(
                        "{} min for {} could not be saved ({e}); run `docket retry` to save it",
                        entry.duration_minutes, entry.subject_id
                    ),
                ));

                let err = DocketError::Persistence {
                    subject_id: entry.subject_id.clone(),
                    minutes: entry.duration_minutes,
                    reason: e.to_string(),
                };
                self.unsaved.push(entry);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;

    use super::*;
    use crate::core::ManualClock;
    use crate::features::timer::policy::HARD_LIMIT_MS;
    use crate::notify::MockNotifier;
    use crate::storage::time_entries::MockTimeEntrySink;
    use crate::storage::{Database, TimeEntryStorage};

    const MINUTE: i64 = 60_000;
    const HOUR: i64 = 60 * MINUTE;

    fn service<S: TimeEntrySink, N: Notifier>(
        sink: S,
        notifier: N,
    ) -> (TimerService<S, N, ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_700_000_000_000);
        let engine = TimerEngine::with_clock(clock.clone());
        (TimerService::with_engine(engine, sink, notifier), clock)
    }

    fn quiet_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);
        notifier
    }

    #[test]
    fn test_stop_saves_entry() {
        let mut sink = MockTimeEntrySink::new();
        sink.expect_create()
            .withf(|e| e.subject_id == "task-1" && e.duration_minutes == 25 && e.is_billable)
            .times(1)
            .returning(|_| Ok(11));

        let (mut svc, clock) = service(sink, quiet_notifier());
        svc.start("task-1").unwrap();
        clock.advance(25 * MINUTE);

        let outcome = svc.stop().unwrap().unwrap();
        assert_eq!(outcome.entry_id, Some(11));
        assert_eq!(outcome.stopped.elapsed_ms, 1_500_000);
        assert_eq!(
            (outcome.entry.end_timestamp - outcome.entry.start_timestamp).num_minutes(),
            25
        );
        assert_eq!(svc.state(), TimerState::Idle);
        assert_eq!(svc.elapsed_ms(), 0);
    }

    #[test]
    fn test_stop_when_idle() {
        let mut sink = MockTimeEntrySink::new();
        sink.expect_create().times(0);

        let (mut svc, _clock) = service(sink, quiet_notifier());
        assert!(svc.stop().unwrap().is_none());
        assert_eq!(svc.state(), TimerState::Idle);
    }

    #[test]
    fn test_zero_length_session_not_saved() {
        let mut sink = MockTimeEntrySink::new();
        sink.expect_create().times(0);

        let (mut svc, _clock) = service(sink, quiet_notifier());
        svc.start("task-1").unwrap();
        let outcome = svc.stop().unwrap().unwrap();
        assert_eq!(outcome.entry_id, None);
        assert_eq!(outcome.entry.duration_minutes, 0);
    }

    #[test]
    fn test_start_saves_previous_session() {
        let mut sink = MockTimeEntrySink::new();
        sink.expect_create()
            .withf(|e| e.subject_id == "task-a" && e.duration_minutes == 10)
            .times(1)
            .returning(|_| Ok(1));

        let (mut svc, clock) = service(sink, quiet_notifier());
        svc.start("task-a").unwrap();
        clock.advance(10 * MINUTE);

        let previous = svc.start("task-b").unwrap().unwrap();
        assert_eq!(previous.stopped.subject_id, "task-a");
        assert_eq!(svc.snapshot().subject_id.as_deref(), Some("task-b"));
        assert_eq!(svc.elapsed_ms(), 0);
    }

    #[test]
    fn test_stop_options_override_defaults() {
        let mut sink = MockTimeEntrySink::new();
        sink.expect_create()
            .withf(|e| {
                !e.is_billable
                    && e.description.as_deref() == Some("Reviewed discovery")
                    && e.duration_minutes == 12
            })
            .times(1)
            .returning(|_| Ok(3));

        let (svc, clock) = service(sink, quiet_notifier());
        let mut svc = svc.with_defaults(EntryDefaults {
            billable: true,
            increment_minutes: 6,
        });
        svc.start("task-1").unwrap();
        clock.advance(7 * MINUTE);

        svc.stop_with(StopOptions {
            description: Some("Reviewed discovery".to_string()),
            billable: Some(false),
        })
        .unwrap();
    }

    #[test]
    fn test_pause_excluded_from_entry() {
        let mut sink = MockTimeEntrySink::new();
        sink.expect_create()
            .withf(|e| e.duration_minutes == 5)
            .times(1)
            .returning(|_| Ok(1));

        let (mut svc, clock) = service(sink, quiet_notifier());
        svc.start("task-1").unwrap();
        clock.advance(3 * MINUTE);
        svc.pause();
        clock.advance(HOUR);
        svc.resume();
        clock.advance(2 * MINUTE);
        svc.stop().unwrap();
    }

    #[test]
    fn test_failed_save_is_kept_and_reported() {
        let mut seq = Sequence::new();
        let mut sink = MockTimeEntrySink::new();
        sink.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DocketError::Database("database is locked".to_string())));
        sink.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(42));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.kind == NoticeKind::Error && n.message.contains("docket retry"))
            .times(1)
            .return_const(());

        let (mut svc, clock) = service(sink, notifier);
        svc.start("task-1").unwrap();
        clock.advance(30 * MINUTE);

        let err = svc.stop().unwrap_err();
        assert!(matches!(err, DocketError::Persistence { minutes: 30, .. }));
        assert_eq!(svc.state(), TimerState::Idle);
        assert_eq!(svc.unsaved().len(), 1);
        assert_eq!(svc.unsaved()[0].duration_minutes, 30);

        let report = svc.retry_unsaved();
        assert_eq!(report.saved, vec![42]);
        assert_eq!(report.remaining, 0);
        assert!(svc.unsaved().is_empty());
    }

    #[test]
    fn test_retry_keeps_entries_that_still_fail() {
        let mut sink = MockTimeEntrySink::new();
        sink.expect_create()
            .returning(|_| Err(DocketError::Database("read-only".to_string())));

        let (mut svc, _clock) = service(sink, quiet_notifier());
        let (reference, _) = service(MockTimeEntrySink::new(), quiet_notifier());
        let stopped = StoppedSession {
            subject_id: "task-1".to_string(),
            opened_at: 0,
            ended_at: 60_000,
            elapsed_ms: 60_000,
        };
        let entry = reference.entry_for(&stopped, &StopOptions::default());
        svc.queue_unsaved([entry.clone(), entry]);

        let report = svc.retry_unsaved();
        assert!(report.saved.is_empty());
        assert_eq!(report.remaining, 2);

        assert_eq!(svc.discard_unsaved().len(), 2);
        assert!(svc.unsaved().is_empty());
    }

    #[test]
    fn test_tick_warns_once_then_auto_stops_once() {
        let mut sink = MockTimeEntrySink::new();
        sink.expect_create()
            .withf(|e| e.subject_id == "t1" && e.duration_minutes == 360)
            .times(1)
            .returning(|_| Ok(9));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.kind == NoticeKind::Warning)
            .times(1)
            .return_const(());
        notifier
            .expect_notify()
            .withf(|n| n.kind == NoticeKind::AutoStopped && n.subject_id.as_deref() == Some("t1"))
            .times(1)
            .return_const(());

        let (mut svc, clock) = service(sink, notifier);
        svc.start("t1").unwrap();

        // Poll every 100ms around the warning threshold
        clock.advance(5 * HOUR - 500);
        for _ in 0..20 {
            svc.tick().unwrap();
            clock.advance(100);
        }
        assert!(svc.is_warned());

        clock.advance(HOUR);
        let event = svc.tick().unwrap();
        assert!(matches!(event, Some(PolicyEvent::AutoStopped(_))));
        assert_eq!(svc.elapsed_ms(), 0);

        for _ in 0..20 {
            assert!(svc.tick().unwrap().is_none());
            clock.advance(100);
        }
    }

    #[test]
    fn test_auto_stop_with_failed_save() {
        let mut sink = MockTimeEntrySink::new();
        sink.expect_create()
            .times(1)
            .returning(|_| Err(DocketError::Database("disk I/O error".to_string())));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| n.kind == NoticeKind::AutoStopped)
            .times(1)
            .return_const(());
        notifier
            .expect_notify()
            .withf(|n| n.kind == NoticeKind::Error)
            .times(1)
            .return_const(());

        let (mut svc, clock) = service(sink, notifier);
        svc.start("t1").unwrap();
        clock.advance(7 * HOUR);

        assert!(svc.tick().is_err());
        assert_eq!(svc.unsaved().len(), 1);
        assert_eq!(svc.state(), TimerState::Idle);
        assert!(svc.tick().unwrap().is_none());
    }

    #[test]
    fn test_restore_keeps_warning_state() {
        let (mut svc, clock) = service(MockTimeEntrySink::new(), quiet_notifier());
        let now = clock.now_ms();
        svc.restore(StoredTimer {
            session: crate::features::timer::TimerSession {
                subject_id: "t1".to_string(),
                generation: 4,
                opened_at: now - 5 * HOUR - MINUTE,
                started_at: now - 5 * HOUR - MINUTE,
                paused_at: None,
                accumulated_ms: 0,
            },
            warned: true,
        });

        assert!(svc.is_warned());
        assert!(svc.tick().unwrap().is_none());
    }

    #[test]
    fn test_with_sqlite_storage() {
        let storage = TimeEntryStorage::with_database(Database::open_in_memory().unwrap());
        let (mut svc, clock) = service(storage, quiet_notifier());

        svc.start("case-17/task-3").unwrap();
        clock.advance(HARD_LIMIT_MS as i64 / 4);
        let outcome = svc.stop().unwrap().unwrap();

        let id = outcome.entry_id.unwrap();
        let saved = svc.sink().get(id).unwrap().unwrap();
        assert_eq!(saved.entry.duration_minutes, 90);
        assert_eq!(saved.entry.subject_id, "case-17/task-3");
    }
}
