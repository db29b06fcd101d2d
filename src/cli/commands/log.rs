//! Time entry commands.

use super::CliContext;
use crate::cli::args::OutputFormat;
use crate::error::DocketError;
use crate::output::{format_entries, format_retry, format_unsaved};

/// List saved entries, or the unsaved queue.
///
/// # Errors
///
/// Returns an error if the entries cannot be read.
pub fn log(
    ctx: &CliContext,
    subject: Option<&str>,
    limit: usize,
    unsaved: bool,
    format: OutputFormat,
) -> Result<String, DocketError> {
    if unsaved {
        return format_unsaved(ctx.service().unsaved(), "Unsaved", format);
    }

    match subject {
        Some(subject) => {
            let entries = ctx.entries().by_subject(subject, limit)?;
            format_entries(&entries, subject, format)
        }
        None => format_entries(&ctx.entries().recent(limit)?, "Recent", format),
    }
}

/// Try to save every queued entry.
///
/// # Errors
///
/// Returns an error if the queue cannot be written back.
pub fn retry(ctx: &mut CliContext, format: OutputFormat) -> Result<String, DocketError> {
    let report = ctx.service_mut().retry_unsaved();
    ctx.save()?;
    format_retry(&report, format)
}

/// Drop every queued entry.
///
/// # Errors
///
/// Returns `DocketError::Usage` without `force`, or an error if the queue
/// cannot be written back.
pub fn discard(ctx: &mut CliContext, force: bool, format: OutputFormat) -> Result<String, DocketError> {
    let count = ctx.service().unsaved().len();
    if count > 0 && !force {
        return Err(DocketError::Usage(format!(
            "{count} unsaved entries would be lost; pass --force to discard them"
        )));
    }

    let dropped = ctx.service_mut().discard_unsaved();
    ctx.save()?;
    format_unsaved(&dropped, "Discarded", format)
}
