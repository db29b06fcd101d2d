//! User-facing notices from the timer.
//!
//! The timer service reports long-session warnings, auto-stops and failed
//! saves through a [`Notifier`]. Delivery is at-least-once; deciding whether a
//! notice is a duplicate is the policy's job, not the notifier's.

use std::cell::RefCell;
#[cfg(target_os = "macos")]
use std::process::Command;
use std::rc::Rc;

use colored::Colorize;
use serde::Serialize;
use tracing::debug;

/// Kind of notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The session is approaching the hard limit
    Warning,
    /// The session was stopped at the hard limit
    AutoStopped,
    /// Something failed and needs the user's attention
    Error,
}

impl NoticeKind {
    /// Title used for desktop notifications.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Warning => "Docket - Long Timer",
            Self::AutoStopped => "Docket - Timer Stopped",
            Self::Error => "Docket - Not Saved",
        }
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Kind of notice
    pub kind: NoticeKind,
    /// Subject the notice is about
    pub subject_id: Option<String>,
    /// Text to show
    pub message: String,
}

impl Notice {
    /// Create a notice.
    #[must_use]
    pub fn new(kind: NoticeKind, subject_id: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject_id: subject_id.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Somewhere notices are shown.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    /// Show `notice` to the user.
    fn notify(&self, notice: &Notice);
}

impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(&self, notice: &Notice) {
        self.0.notify(notice);
        self.1.notify(notice);
    }
}

impl<N: Notifier> Notifier for Option<N> {
    fn notify(&self, notice: &Notice) {
        if let Some(inner) = self {
            inner.notify(notice);
        }
    }
}

/// Writes notices to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: &Notice) {
        let label = match notice.kind {
            NoticeKind::Warning => "warning".yellow().bold(),
            NoticeKind::AutoStopped => "auto-stopped".magenta().bold(),
            NoticeKind::Error => "error".red().bold(),
        };
        eprintln!("{label}: {}", notice.message);
    }
}

/// Shows notices as desktop notifications where supported.
///
/// Only macOS is supported; elsewhere this is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, notice: &Notice) {
        #[cfg(target_os = "macos")]
        {
            let script = format!(
                r#"display notification "{}" with title "{}""#,
                notice.message.replace('"', "\\\""),
                notice.kind.title()
            );

            if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
                debug!(error = %e, "desktop notification failed");
            }
        }

        #[cfg(not(target_os = "macos"))]
        {
            debug!(title = notice.kind.title(), "desktop notifications unsupported");
        }
    }
}

/// Keeps notices in memory for a UI to display.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl NoticeLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return all notices received so far.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        self.notices.borrow_mut().drain(..).collect()
    }

    /// Number of notices waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notices.borrow().len()
    }

    /// Whether no notices are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_log_shared_between_clones() {
        let log = NoticeLog::new();
        let handle = log.clone();

        handle.notify(&Notice::new(NoticeKind::Warning, Some("task-1"), "5 hours"));
        assert_eq!(log.len(), 1);

        let drained = log.drain();
        assert_eq!(drained[0].subject_id.as_deref(), Some("task-1"));
        assert!(handle.is_empty());
    }

    #[test]
    fn test_pair_notifies_both() {
        let first = NoticeLog::new();
        let second = NoticeLog::new();
        let pair = (first.clone(), second.clone());

        pair.notify(&Notice::new(NoticeKind::Error, None, "disk full"));
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_disabled_notifier_is_silent() {
        let log = NoticeLog::new();
        let disabled: Option<NoticeLog> = None;
        let pair = (log.clone(), disabled);

        pair.notify(&Notice::new(NoticeKind::Warning, None, "5 hours"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_kind_titles_differ() {
        assert_ne!(NoticeKind::Warning.title(), NoticeKind::AutoStopped.title());
        assert_ne!(NoticeKind::AutoStopped.title(), NoticeKind::Error.title());
    }
}
