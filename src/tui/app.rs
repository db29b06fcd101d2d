//! Application state for the TUI.

use std::collections::HashMap;

use crate::context::TimerContext;
use crate::core::{Clock, SystemClock};
use crate::error::DocketError;
use crate::features::timer::{Controls, PolicyEvent, StopOutcome, TimerSnapshot};
use crate::notify::{Notice, NoticeLog};

const RECENT_SUBJECTS: usize = 20;

/// Application state.
pub struct App<C = SystemClock> {
    ctx: TimerContext<NoticeLog, C>,
    notices: NoticeLog,
    /// Tasks shown as rows.
    pub subjects: Vec<String>,
    /// Saved minutes per task.
    pub totals: HashMap<String, i64>,
    /// Currently selected row.
    pub selected: usize,
    /// Status message to display.
    pub status: Option<String>,
    /// Most recent notice from the timer.
    pub last_notice: Option<Notice>,
    /// Pending 'g' key for 'gg' command.
    pub pending_g: bool,
    fresh_notice: Option<Notice>,
}

impl<C: Clock> App<C> {
    /// Create the app around a loaded timer.
    ///
    /// `notices` must be the log the context's service notifies into.
    ///
    /// # Errors
    ///
    /// Returns an error if recent tasks cannot be read.
    pub fn new(
        ctx: TimerContext<NoticeLog, C>,
        notices: NoticeLog,
        subjects: Vec<String>,
    ) -> Result<Self, DocketError> {
        let mut app = Self {
            ctx,
            notices,
            subjects,
            totals: HashMap::new(),
            selected: 0,
            status: Some("Press ? for help".to_string()),
            last_notice: None,
            pending_g: false,
            fresh_notice: None,
        };
        app.refresh()?;

        if let Some(active) = app.snapshot().subject_id {
            app.selected = app.subjects.iter().position(|s| *s == active).unwrap_or(0);
        }
        Ok(app)
    }

    /// The timer, read once per frame by every panel.
    #[must_use]
    pub fn snapshot(&self) -> TimerSnapshot {
        self.ctx.service().snapshot()
    }

    /// Fraction of the hard limit used by the active session.
    #[must_use]
    pub fn progress(&self, snapshot: &TimerSnapshot) -> f64 {
        self.ctx.service().policy().progress(snapshot.elapsed_ms)
    }

    /// Whether the active session has been warned.
    #[must_use]
    pub fn is_warned(&self) -> bool {
        self.ctx.service().is_warned()
    }

    /// Number of entries waiting for a retry.
    #[must_use]
    pub fn unsaved(&self) -> usize {
        self.ctx.service().unsaved().len()
    }

    /// Controls offered for a task.
    #[must_use]
    pub fn controls_for(&self, snapshot: &TimerSnapshot, subject_id: &str) -> Controls {
        Controls::for_subject(snapshot, subject_id)
    }

    /// Reload task rows and saved totals.
    ///
    /// Tasks named on the command line come first, then the active task and
    /// recently timed ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the time entries cannot be read.
    pub fn refresh(&mut self) -> Result<(), DocketError> {
        let mut subjects = std::mem::take(&mut self.subjects);
        if let Some(active) = self.snapshot().subject_id {
            subjects.push(active);
        }
        subjects.extend(self.ctx.entries().subjects(RECENT_SUBJECTS)?);

        let mut seen = std::collections::HashSet::new();
        subjects.retain(|s| seen.insert(s.clone()));
        self.subjects = subjects;

        self.totals.clear();
        for subject in &self.subjects {
            let total = self.ctx.entries().total_minutes(subject)?;
            self.totals.insert(subject.clone(), total);
        }

        if !self.subjects.is_empty() && self.selected >= self.subjects.len() {
            self.selected = self.subjects.len() - 1;
        }
        Ok(())
    }

    /// The selected task.
    #[must_use]
    pub fn selected_subject(&self) -> Option<&str> {
        self.subjects.get(self.selected).map(String::as_str)
    }

    /// Apply the auto-stop policy and pick up notices.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer cannot be written back.
    pub fn tick(&mut self) -> Result<(), DocketError> {
        if let Some(PolicyEvent::AutoStopped(_)) = self.ctx.tick()? {
            self.refresh()?;
        }
        self.collect_notices();
        Ok(())
    }

    /// Start timing the selected task.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer cannot be written back.
    pub fn start_selected(&mut self) -> Result<(), DocketError> {
        let Some(subject) = self.selected_subject().map(str::to_string) else {
            return Ok(());
        };

        let result = self.ctx.service_mut().start(subject.as_str());
        self.ctx.save()?;
        self.status = Some(match result {
            Ok(Some(previous)) => format!("{} | Started: {subject}", saved_message(&previous)),
            Ok(None) => format!("Started: {subject}"),
            Err(e) => e.to_string(),
        });
        self.refresh()?;
        self.collect_notices();
        Ok(())
    }

    /// Pause or resume, whichever the selected row offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer cannot be written back.
    pub fn toggle_pause(&mut self) -> Result<(), DocketError> {
        let snapshot = self.snapshot();
        let Some(subject) = snapshot.subject_id.clone() else {
            self.status = Some("No timer running".to_string());
            return Ok(());
        };

        match Controls::for_subject(&snapshot, &subject) {
            Controls::PauseOrStop => {
                self.ctx.service_mut().pause();
                self.status = Some(format!("Paused: {subject}"));
            }
            Controls::ResumeOrStop => {
                self.ctx.service_mut().resume();
                self.status = Some(format!("Resumed: {subject}"));
            }
            Controls::Start => {}
        }
        self.ctx.save()
    }

    /// Stop the timer and save the entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer cannot be written back.
    pub fn stop(&mut self) -> Result<(), DocketError> {
        let result = self.ctx.service_mut().stop();
        self.ctx.save()?;
        self.status = Some(match result {
            Ok(Some(outcome)) => saved_message(&outcome),
            Ok(None) => "No timer running".to_string(),
            Err(e) => e.to_string(),
        });
        self.refresh()?;
        self.collect_notices();
        Ok(())
    }

    /// Move selection up.
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.pending_g = false;
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        if !self.subjects.is_empty() && self.selected < self.subjects.len() - 1 {
            self.selected += 1;
        }
        self.pending_g = false;
    }

    /// Jump to first row.
    pub fn select_first(&mut self) {
        self.selected = 0;
        self.pending_g = false;
    }

    /// Jump to last row.
    pub fn select_last(&mut self) {
        if !self.subjects.is_empty() {
            self.selected = self.subjects.len() - 1;
        }
        self.pending_g = false;
    }

    /// Handle 'g' key for 'gg' command.
    pub fn handle_g(&mut self) {
        if self.pending_g {
            self.select_first();
        } else {
            self.pending_g = true;
            self.status = Some("g-".to_string());
        }
    }

    /// Cancel pending 'g' command.
    pub fn cancel_pending(&mut self) {
        self.pending_g = false;
        self.status = None;
    }

    /// The latest notice, if it has not been taken yet.
    pub fn take_fresh_notice(&mut self) -> Option<Notice> {
        self.fresh_notice.take()
    }

    fn collect_notices(&mut self) {
        if let Some(notice) = self.notices.drain().pop() {
            self.status = None;
            self.fresh_notice = Some(notice.clone());
            self.last_notice = Some(notice);
        }
    }
}

fn saved_message(outcome: &StopOutcome) -> String {
    match outcome.entry_id {
        Some(id) => format!(
            "Saved {} min for {} (#{id})",
            outcome.entry.duration_minutes, outcome.stopped.subject_id
        ),
        None => format!("Stopped: {}", outcome.stopped.subject_id),
    }
}
