//! The timer as seen by one `docket` process.
//!
//! Loads the live session and the unsaved queue, hands out the
//! [`TimerService`] for one command, and writes both back afterwards.

use tracing::warn;

use crate::config::{Config, Paths};
use crate::core::{Clock, SystemClock};
use crate::error::DocketError;
use crate::features::timer::{EntryDefaults, PolicyEvent, TimerEngine, TimerService};
use crate::notify::Notifier;
use crate::output::StatusReport;
use crate::storage::{Database, PendingQueue, SessionStore, TimeEntryStorage};

/// The timer service together with the stores it is loaded from.
pub struct TimerContext<N, C = SystemClock> {
    service: TimerService<TimeEntryStorage, N, C>,
    store: SessionStore,
    pending: PendingQueue,
}

impl<N: Notifier> TimerContext<N, SystemClock> {
    /// Load the timer from the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the database or the pending queue cannot be read.
    pub fn open(paths: &Paths, config: &Config, notifier: N) -> Result<Self, DocketError> {
        Self::open_with_clock(paths, config, notifier, SystemClock)
    }
}

impl<N: Notifier, C: Clock> TimerContext<N, C> {
    /// Load the timer from the data directory, reading `clock`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database or the pending queue cannot be read.
    pub fn open_with_clock(
        paths: &Paths,
        config: &Config,
        notifier: N,
        clock: C,
    ) -> Result<Self, DocketError> {
        paths.ensure_dirs()?;

        let entries = TimeEntryStorage::with_database(Database::open_at(&paths.database)?);
        let store = SessionStore::with_database(Database::open_at(&paths.database)?);
        let pending = PendingQueue::at(&paths.pending);

        let mut service = TimerService::with_engine(TimerEngine::with_clock(clock), entries, notifier)
            .with_defaults(EntryDefaults::from(&config.timer));

        if let Some(stored) = store.load()? {
            service.restore(stored);
        }
        service.queue_unsaved(pending.load()?);

        Ok(Self {
            service,
            store,
            pending,
        })
    }

    /// The timer service.
    #[must_use]
    pub const fn service(&self) -> &TimerService<TimeEntryStorage, N, C> {
        &self.service
    }

    /// The timer service, mutably.
    pub fn service_mut(&mut self) -> &mut TimerService<TimeEntryStorage, N, C> {
        &mut self.service
    }

    /// Saved time entries.
    #[must_use]
    pub const fn entries(&self) -> &TimeEntryStorage {
        self.service.sink()
    }

    /// Apply the auto-stop policy and write back anything it changed.
    ///
    /// An auto-stopped session that fails to save has already been reported
    /// and queued. The timer is still written back as idle, with the entry in
    /// the unsaved queue, so the next process does not stop it again.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer cannot be written back.
    pub fn tick(&mut self) -> Result<Option<PolicyEvent>, DocketError> {
        let before = self.generation();
        let event = self.service.tick().unwrap_or_else(|e| {
            warn!(error = %e, "auto-stopped session not saved");
            None
        });

        if event.is_some() || self.generation() != before {
            self.save()?;
        }
        Ok(event)
    }

    /// Write the live session and the unsaved queue back.
    ///
    /// The unsaved queue is written first and both writes are always
    /// attempted, so a broken database cannot also lose queued entries.
    ///
    /// # Errors
    ///
    /// Returns the first error from either store.
    pub fn save(&self) -> Result<(), DocketError> {
        let queued = self.pending.store(self.service.unsaved());
        let stored = self
            .store
            .save(self.service.engine().session(), self.service.is_warned());
        queued.and(stored)
    }

    fn generation(&self) -> Option<u64> {
        self.service.engine().session().map(|s| s.generation)
    }

    /// The current status.
    #[must_use]
    pub fn status(&self) -> StatusReport {
        let timer = self.service.snapshot();
        StatusReport {
            clock: timer.clock(),
            progress: self.service.policy().progress(timer.elapsed_ms),
            warned: self.service.is_warned(),
            unsaved: self.service.unsaved().len(),
            timer,
        }
    }
}
