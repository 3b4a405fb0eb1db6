// Duration math and display formatting.
//
// Boundaries
// - Pure functions. "now" is always a parameter, never read here.
// - Malformed input degrades to zero or a placeholder; nothing here errors.

use crate::modules::timesheets::core::time_log::BreakRecord;
use crate::shared::core::primitives::Timestamp;

pub const PLACEHOLDER: &str = "--:--";

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// `b - a` in milliseconds. Negative when `b` precedes `a`.
pub fn milliseconds_between(a: Timestamp, b: Timestamp) -> i64 {
    (b - a).num_milliseconds()
}

/// `HH:MM:SS`, hours unbounded. Negative input renders as zero.
pub fn format_elapsed(ms: i64) -> String {
    let total_seconds = ms.max(0) / MS_PER_SECOND;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

fn plural_hours(hours: i64) -> String {
    if hours == 1 {
        "1 hour".to_string()
    } else {
        format!("{hours} hours")
    }
}

/// Human readable hours and minutes, e.g. `2 hours, 5 min`.
/// Takes `f64` so NaN from upstream arithmetic maps to the placeholder.
pub fn format_hours_minutes(ms: f64) -> String {
    if ms.is_nan() || ms < 0.0 {
        return PLACEHOLDER.to_string();
    }
    let total_minutes = (ms / MS_PER_MINUTE as f64).floor() as i64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    match (hours, minutes) {
        (0, m) => format!("{m} min"),
        (h, 0) => plural_hours(h),
        (h, m) => format!("{}, {m} min", plural_hours(h)),
    }
}

/// Compact form used in history rows: `3h 20m` or `45m`.
pub fn format_duration_short(ms: i64) -> String {
    let total_minutes = ms.max(0) / MS_PER_MINUTE;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Completed breaks only. Ongoing breaks are added by callers from the live clock.
pub fn sum_break_durations(breaks: &[BreakRecord]) -> i64 {
    breaks
        .iter()
        .filter_map(|b| b.end_time.map(|end| milliseconds_between(b.start_time, end)))
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkTarget {
    Under,
    Met,
    Over(String),
}

/// Compare worked time with a daily target and describe any overtime.
pub fn evaluate_work_target(worked_ms: i64, target_hours: u32) -> WorkTarget {
    let target_ms = i64::from(target_hours) * MS_PER_HOUR;
    if worked_ms < target_ms {
        return WorkTarget::Under;
    }
    if worked_ms == target_ms {
        return WorkTarget::Met;
    }

    let overtime_minutes = (worked_ms - target_ms) / MS_PER_MINUTE;
    let hours = overtime_minutes / 60;
    let minutes = overtime_minutes % 60;
    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours} hour{}", if hours == 1 { "" } else { "s" }));
    }
    if minutes > 0 {
        parts.push(format!("{minutes} minute{}", if minutes == 1 { "" } else { "s" }));
    }
    WorkTarget::Over(parts.join(" "))
}
