//! Command implementations for docket.
//!
//! Timer commands run against a [`TimerContext`] opened by [`open_context`],
//! which applies the auto-stop policy before the command itself runs.

mod config;
mod log;
mod timer;

pub use config::config;
pub use log::{discard, log, retry};
pub use timer::{pause, resume, start, status, stop, watch};

use crate::config::{Config, Paths};
use crate::context::TimerContext;
use crate::error::DocketError;
use crate::notify::{DesktopNotifier, StderrNotifier};

/// Notices from CLI commands go to stderr, and optionally the desktop.
pub type CliNotifier = (StderrNotifier, Option<DesktopNotifier>);

/// The timer context used by CLI commands.
pub type CliContext = TimerContext<CliNotifier>;

/// Load the timer and catch up on the auto-stop policy.
///
/// # Errors
///
/// Returns an error if the timer cannot be loaded or written back.
pub fn open_context(paths: &Paths, config: &Config) -> Result<CliContext, DocketError> {
    let notifier = (
        StderrNotifier,
        config.notifications.desktop.then_some(DesktopNotifier),
    );
    let mut ctx = TimerContext::open(paths, config, notifier)?;
    ctx.tick()?;
    Ok(ctx)
}
