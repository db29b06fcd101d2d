//! Duration formatting for timer displays and time entries.

/// Milliseconds in one minute.
const MINUTE_MS: u64 = 60_000;

/// Format elapsed milliseconds as `HH:MM:SS`.
#[must_use]
pub fn format_clock(elapsed_ms: u64) -> String {
    let total_seconds = elapsed_ms / 1_000;
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Format elapsed milliseconds as a human-readable string.
#[must_use]
pub fn format_duration(elapsed_ms: u64) -> String {
    let total_minutes = elapsed_ms / MINUTE_MS;

    if total_minutes < 1 {
        let seconds = elapsed_ms / 1_000;
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{} hour{}, {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                minutes,
                if minutes == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    } else {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    }
}

/// Format a minute count as a short string (e.g., "25m", "1h 30m").
#[must_use]
pub fn format_minutes_short(total_minutes: i64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Minutes to bill for `elapsed_ms`, rounded up to `increment_minutes`.
///
/// Any non-zero duration bills at least one increment. An increment of zero
/// is treated as one minute.
#[must_use]
pub fn billable_minutes(elapsed_ms: u64, increment_minutes: u32) -> i64 {
    if elapsed_ms == 0 {
        return 0;
    }
    let increment = u64::from(increment_minutes.max(1));
    let units = elapsed_ms.div_ceil(increment * MINUTE_MS);
    i64::try_from(units * increment).unwrap_or(i64::MAX)
}

/// Render a progress bar.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(5_000), "00:00:05");
        assert_eq!(format_clock(3_661_999), "01:01:01");
        assert_eq!(format_clock(21_600_000), "06:00:00");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0 seconds");
        assert_eq!(format_duration(1_000), "1 second");
        assert_eq!(format_duration(25 * MINUTE_MS), "25 minutes");
        assert_eq!(format_duration(MINUTE_MS), "1 minute");
        assert_eq!(format_duration(120 * MINUTE_MS), "2 hours");
        assert_eq!(format_duration(90 * MINUTE_MS), "1 hour, 30 minutes");
    }

    #[test]
    fn test_format_minutes_short() {
        assert_eq!(format_minutes_short(25), "25m");
        assert_eq!(format_minutes_short(90), "1h 30m");
        assert_eq!(format_minutes_short(0), "0m");
    }

    #[test]
    fn test_billable_minutes_rounds_up() {
        assert_eq!(billable_minutes(0, 1), 0);
        assert_eq!(billable_minutes(1, 1), 1);
        assert_eq!(billable_minutes(60_000, 1), 1);
        assert_eq!(billable_minutes(60_001, 1), 2);
    }

    #[test]
    fn test_billable_minutes_six_minute_increment() {
        assert_eq!(billable_minutes(MINUTE_MS, 6), 6);
        assert_eq!(billable_minutes(6 * MINUTE_MS, 6), 6);
        assert_eq!(billable_minutes(7 * MINUTE_MS, 6), 12);
        assert_eq!(billable_minutes(7 * MINUTE_MS, 0), 7);
    }

    #[test]
    fn test_render_progress_bar() {
        let bar = render_progress_bar(0.5, 10);
        assert!(bar.contains("█████"));
        assert!(bar.contains("░░░░░"));
        assert_eq!(render_progress_bar(2.0, 4), "[████]");
    }
}
