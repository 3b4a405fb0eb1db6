// Day projection: cumulative work and break time for one date as of an instant.
//
// Responsibilities
// - Pick the applicable entry for a date, tolerating duplicate entries.
// - Compute totals from timestamps, live for today's open entry.
//
// Boundaries
// - No input or output beyond tracing warnings for inconsistent data.

use crate::modules::timesheets::core::time_arithmetic::{milliseconds_between, sum_break_durations};
use crate::modules::timesheets::core::time_log::{BreakRecord, TimeLogEntry};
use crate::shared::core::primitives::{Timestamp, day_of};
use chrono::NaiveDate;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DayStats {
    pub clocked_in_at: Option<String>,
    pub total_work_ms: i64,
    pub total_break_ms: i64,
}

/// The entry for `date`. When several exist, an open one wins, then the latest
/// clock-in, then the one listed last.
pub fn find_log_for_date(logs: &[TimeLogEntry], date: NaiveDate) -> Option<&TimeLogEntry> {
    let candidates: Vec<(usize, &TimeLogEntry)> = logs
        .iter()
        .enumerate()
        .filter(|(_, log)| log.date == date)
        .collect();

    if candidates.len() > 1 {
        warn!(
            %date,
            count = candidates.len(),
            "data inconsistency: more than one time log for the same date"
        );
    }

    candidates
        .into_iter()
        .max_by_key(|(position, log)| (log.is_open(), log.clock_in_time, *position))
        .map(|(_, log)| log)
}

/// The ongoing break of an entry. Several ongoing breaks violate the entry
/// invariant; the chronologically last one is used.
pub fn latest_ongoing_break(entry: &TimeLogEntry) -> Option<&BreakRecord> {
    let ongoing: Vec<&BreakRecord> = entry.ongoing_breaks().collect();
    if ongoing.len() > 1 {
        warn!(
            log_id = %entry.id,
            count = ongoing.len(),
            "data inconsistency: more than one ongoing break"
        );
    }
    ongoing.into_iter().max_by_key(|b| b.start_time)
}

/// Short clock time for display, e.g. `9:05 AM`.
pub fn format_clock_time(instant: Timestamp) -> String {
    instant.format("%-I:%M %p").to_string()
}

pub fn project_entry(entry: &TimeLogEntry, now: Timestamp) -> DayStats {
    let is_today = entry.date == day_of(now);
    let completed_break_ms = sum_break_durations(&entry.breaks);

    let live_break_ms = if is_today && entry.is_open() {
        latest_ongoing_break(entry)
            .map(|b| milliseconds_between(b.start_time, now).max(0))
            .unwrap_or(0)
    } else {
        0
    };
    let total_break_ms = completed_break_ms + live_break_ms;

    let total_work_ms = match (entry.clock_in_time, entry.clock_out_time) {
        (None, _) => 0,
        (Some(clock_in), Some(clock_out)) => {
            let gross = milliseconds_between(clock_in, clock_out);
            entry
                .total_work_ms
                .unwrap_or(gross - completed_break_ms)
                .min(gross)
        }
        (Some(clock_in), None) if is_today => milliseconds_between(clock_in, now) - total_break_ms,
        (Some(_), None) => {
            warn!(log_id = %entry.id, date = %entry.date, "open time log on a past date");
            entry.total_work_ms.unwrap_or(0)
        }
    };

    DayStats {
        clocked_in_at: entry.clock_in_time.map(format_clock_time),
        total_work_ms: total_work_ms.max(0),
        total_break_ms,
    }
}

pub fn project_day(logs: &[TimeLogEntry], target_date: NaiveDate, now: Timestamp) -> DayStats {
    match find_log_for_date(logs, target_date) {
        Some(entry) => project_entry(entry, now),
        None => DayStats::default(),
    }
}
