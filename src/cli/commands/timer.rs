//! Timer commands.

use std::io::Write;
use std::thread;
use std::time::Duration;

use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, execute};

use super::{open_context, CliContext};
use crate::cli::args::OutputFormat;
use crate::config::{Config, Paths};
use crate::error::DocketError;
use crate::features::timer::{StopOptions, TimerState};
use crate::output::{format_snapshot, format_started, format_status, format_status_pretty, format_stopped};

/// Start timing `subject`, saving whatever was being timed before.
///
/// # Errors
///
/// Returns an error if the previous session could not be saved (it is kept
/// for retry and the new timer is running) or the timer cannot be written.
pub fn start(ctx: &mut CliContext, subject: &str, format: OutputFormat) -> Result<String, DocketError> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(DocketError::Usage("Task identifier cannot be empty".to_string()));
    }

    let result = ctx.service_mut().start(subject);
    let saved = ctx.save();
    let previous = result?;
    saved?;

    format_started(&ctx.service().snapshot(), previous.as_ref(), format)
}

/// Pause the running timer.
///
/// # Errors
///
/// Returns an error if the timer cannot be written.
pub fn pause(ctx: &mut CliContext, format: OutputFormat) -> Result<String, DocketError> {
    ctx.service_mut().pause();
    ctx.save()?;
    format_snapshot(&ctx.service().snapshot(), format)
}

/// Resume a paused timer.
///
/// # Errors
///
/// Returns an error if the timer cannot be written.
pub fn resume(ctx: &mut CliContext, format: OutputFormat) -> Result<String, DocketError> {
    ctx.service_mut().resume();
    ctx.save()?;
    format_snapshot(&ctx.service().snapshot(), format)
}

/// Stop the timer and save the entry.
///
/// # Errors
///
/// Returns an error if the entry could not be saved (it is kept for retry)
/// or the timer cannot be written.
pub fn stop(
    ctx: &mut CliContext,
    note: Option<String>,
    billable: Option<bool>,
    format: OutputFormat,
) -> Result<String, DocketError> {
    let options = StopOptions {
        description: note.filter(|n| !n.trim().is_empty()),
        billable,
    };

    let result = ctx.service_mut().stop_with(options);
    let saved = ctx.save();
    let outcome = result?;
    saved?;

    format_stopped(outcome.as_ref(), format)
}

/// Show the timer.
///
/// # Errors
///
/// Returns `DocketError::Parse` if JSON serialization fails.
pub fn status(ctx: &CliContext, format: OutputFormat) -> Result<String, DocketError> {
    format_status(&ctx.status(), format)
}

/// Redraw the status line until the timer is idle.
///
/// The timer is reloaded on every redraw so changes made by other `docket`
/// processes show up.
///
/// # Errors
///
/// Returns an error if the timer cannot be loaded or the terminal written.
pub fn watch(paths: &Paths, config: &Config, format: OutputFormat) -> Result<String, DocketError> {
    if format == OutputFormat::Json {
        return status(&open_context(paths, config)?, format);
    }

    let interval = Duration::from_millis(config.timer.tick_ms.max(1));
    let mut stdout = std::io::stdout();
    let mut drawn = 0;

    loop {
        let ctx = open_context(paths, config)?;
        let report = ctx.status();
        let text = format_status_pretty(&report);

        if drawn > 0 {
            execute!(stdout, cursor::MoveUp(drawn))?;
        }
        execute!(stdout, cursor::MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
        writeln!(stdout, "{text}")?;
        stdout.flush()?;
        drawn = line_count(&text);

        if report.timer.state == TimerState::Idle {
            break;
        }
        thread::sleep(interval);
    }

    Ok(String::new())
}

fn line_count(text: &str) -> u16 {
    u16::try_from(text.lines().count()).unwrap_or(u16::MAX)
}
