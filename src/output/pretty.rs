use colored::Colorize;

use super::StatusReport;
use crate::features::timer::{
    format_duration, format_minutes_short, render_progress_bar, RetryReport, StopOutcome,
    TimerSnapshot, TimerState,
};
use crate::storage::{NewTimeEntry, TimeEntry};

const PROGRESS_WIDTH: usize = 30;

fn state_label(state: TimerState) -> String {
    match state {
        TimerState::Idle => "idle".dimmed().to_string(),
        TimerState::Running => "running".green().bold().to_string(),
        TimerState::Paused => "paused".yellow().bold().to_string(),
    }
}

/// One line describing the timer.
pub fn format_snapshot_pretty(snapshot: &TimerSnapshot) -> String {
    match &snapshot.subject_id {
        Some(subject) => format!(
            "{} {}  {}",
            state_label(snapshot.state),
            subject.bold(),
            snapshot.clock().cyan()
        ),
        None => format!("{} No timer running", state_label(snapshot.state)),
    }
}

/// Format the timer status.
pub fn format_status_pretty(report: &StatusReport) -> String {
    let mut output = vec![format_snapshot_pretty(&report.timer)];

    if report.timer.state != TimerState::Idle {
        let bar = render_progress_bar(report.progress, PROGRESS_WIDTH);
        let bar = if report.warned {
            bar.red().to_string()
        } else {
            bar.dimmed().to_string()
        };
        output.push(format!("  {bar} {:.0}% of limit", report.progress * 100.0));

        if report.warned {
            output.push(
                "  Long session: the timer stops automatically at 6 hours"
                    .yellow()
                    .to_string(),
            );
        }
    }

    if report.unsaved > 0 {
        output.push(
            format!(
                "  {} unsaved time {} (run 'docket retry')",
                report.unsaved,
                if report.unsaved == 1 { "entry" } else { "entries" }
            )
            .red()
            .to_string(),
        );
    }

    output.join("\n")
}

fn outcome_line(outcome: &StopOutcome) -> String {
    let saved = match outcome.entry_id {
        Some(id) => format!("saved as #{id}").dimmed().to_string(),
        None => "nothing to save".dimmed().to_string(),
    };
    let billable = if outcome.entry.is_billable {
        String::new()
    } else {
        " non-billable".dimmed().to_string()
    };
    format!(
        "{} {}  {} ({}{billable})  {saved}",
        "■".red(),
        outcome.stopped.subject_id.bold(),
        format_duration(outcome.stopped.elapsed_ms),
        format_minutes_short(outcome.entry.duration_minutes),
    )
}

/// Format the result of `start`.
pub fn format_started_pretty(snapshot: &TimerSnapshot, previous: Option<&StopOutcome>) -> String {
    let mut output = Vec::new();
    if let Some(previous) = previous {
        output.push(outcome_line(previous));
    }
    output.push(format_snapshot_pretty(snapshot));
    output.join("\n")
}

/// Format the result of `stop`.
pub fn format_stopped_pretty(outcome: Option<&StopOutcome>) -> String {
    outcome.map_or_else(|| "No timer running".dimmed().to_string(), outcome_line)
}

/// Format saved time entries as a table.
pub fn format_entries_pretty(entries: &[TimeEntry], title: &str) -> String {
    if entries.is_empty() {
        return format!("{title} (0 entries)\n  No entries");
    }

    let total: i64 = entries.iter().map(|e| e.entry.duration_minutes).sum();
    let mut output = format!(
        "{title} ({} entries, {})\n",
        entries.len(),
        format_minutes_short(total)
    );
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for entry in entries {
        let e = &entry.entry;
        let mut line = format!(
            "{:>5}  {}  {:>7}  {}",
            format!("#{}", entry.id).dimmed(),
            e.start_timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            format_minutes_short(e.duration_minutes).cyan(),
            e.subject_id.bold()
        );
        if !e.is_billable {
            line.push_str(&format!("  {}", "non-billable".yellow()));
        }
        if let Some(note) = &e.description {
            line.push_str(&format!("  {}", note.dimmed()));
        }
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format unsaved entries.
pub fn format_unsaved_pretty(entries: &[NewTimeEntry], title: &str) -> String {
    if entries.is_empty() {
        return format!("{title} (0 entries)");
    }

    let mut output = format!("{title} ({} entries)\n", entries.len());
    for e in entries {
        output.push_str(&format!(
            "  {}  {}  {}\n",
            e.start_timestamp
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            format_minutes_short(e.duration_minutes).cyan(),
            e.subject_id.bold()
        ));
    }
    output
}

/// Format the result of `retry`.
pub fn format_retry_pretty(report: &RetryReport) -> String {
    let mut output = if report.saved.is_empty() {
        "No entries saved".dimmed().to_string()
    } else {
        format!("Saved {} time entries", report.saved.len())
            .green()
            .to_string()
    };

    if report.remaining > 0 {
        output.push_str(&format!(
            "\n{}",
            format!("{} entries still unsaved", report.remaining).red()
        ));
    }
    output
}
