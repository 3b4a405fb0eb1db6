// Pure decision functions for the four attendance transitions.
//
// Purpose
// - Validate a transition against a staff member's entries and produce the new
//   or updated record on success.
//
// Responsibilities
// - At most one open entry per staff member; a closed day stays closed.
// - At most one ongoing break per entry; no breaks on a closed entry.
// - No clock-out while a break is running.
// - Never perform input or output.

use crate::modules::timesheets::core::time_arithmetic::{milliseconds_between, sum_break_durations};
use crate::modules::timesheets::core::time_log::{BreakRecord, BreakType, TimeLogEntry};
use crate::shared::core::primitives::{Timestamp, day_of};
use chrono::NaiveDate;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("already clocked in on {0}")]
    AlreadyClockedIn(NaiveDate),

    #[error("already clocked out for {0}")]
    DayAlreadyClosed(NaiveDate),

    #[error("time log {0} not found")]
    LogNotFound(String),

    #[error("time log {0} is already clocked out")]
    LogClosed(String),

    #[error("time log {0} has a break in progress")]
    BreakInProgress(String),

    #[error("break {0} not found or already ended")]
    BreakNotOngoing(String),
}

fn find_log<'a>(entries: &'a [TimeLogEntry], log_id: &str) -> Result<&'a TimeLogEntry, DecideError> {
    entries
        .iter()
        .find(|e| e.id == log_id)
        .ok_or_else(|| DecideError::LogNotFound(log_id.to_string()))
}

fn find_open_log<'a>(entries: &'a [TimeLogEntry], log_id: &str) -> Result<&'a TimeLogEntry, DecideError> {
    let entry = find_log(entries, log_id)?;
    if !entry.is_open() {
        return Err(DecideError::LogClosed(log_id.to_string()));
    }
    Ok(entry)
}

pub fn decide_clock_in(
    entries: &[TimeLogEntry],
    staff_id: &str,
    log_id: String,
    now: Timestamp,
) -> Result<TimeLogEntry, DecideError> {
    if let Some(open) = entries.iter().find(|e| e.is_open()) {
        return Err(DecideError::AlreadyClockedIn(open.date));
    }
    let today = day_of(now);
    if entries.iter().any(|e| e.date == today) {
        return Err(DecideError::DayAlreadyClosed(today));
    }

    Ok(TimeLogEntry {
        id: log_id,
        staff_id: staff_id.to_string(),
        date: today,
        clock_in_time: Some(now),
        clock_out_time: None,
        breaks: Vec::new(),
        total_work_ms: None,
        total_break_ms: None,
    })
}

pub fn decide_clock_out(
    entries: &[TimeLogEntry],
    log_id: &str,
    now: Timestamp,
) -> Result<TimeLogEntry, DecideError> {
    let entry = find_open_log(entries, log_id)?;
    if entry.has_ongoing_break() {
        return Err(DecideError::BreakInProgress(log_id.to_string()));
    }

    let total_break_ms = sum_break_durations(&entry.breaks);
    let gross_ms = entry
        .clock_in_time
        .map(|clock_in| milliseconds_between(clock_in, now))
        .unwrap_or(0);

    let mut closed = entry.clone();
    closed.clock_out_time = Some(now);
    closed.total_break_ms = Some(total_break_ms);
    closed.total_work_ms = Some((gross_ms - total_break_ms).max(0));
    Ok(closed)
}

pub fn decide_start_break(
    entries: &[TimeLogEntry],
    log_id: &str,
    break_id: String,
    break_type: &BreakType,
    now: Timestamp,
) -> Result<BreakRecord, DecideError> {
    let entry = find_open_log(entries, log_id)?;
    if entry.has_ongoing_break() {
        return Err(DecideError::BreakInProgress(log_id.to_string()));
    }

    Ok(BreakRecord {
        id: break_id,
        start_time: now,
        end_time: None,
        break_type: break_type.clone(),
        duration_ms: None,
    })
}

pub fn decide_end_break(
    entries: &[TimeLogEntry],
    log_id: &str,
    break_id: &str,
    now: Timestamp,
) -> Result<BreakRecord, DecideError> {
    let entry = find_log(entries, log_id)?;
    let ongoing = entry
        .breaks
        .iter()
        .find(|b| b.id == break_id && b.is_ongoing())
        .ok_or_else(|| DecideError::BreakNotOngoing(break_id.to_string()))?;

    let mut ended = ongoing.clone();
    ended.end_time = Some(now);
    ended.duration_ms = Some(milliseconds_between(ongoing.start_time, now).max(0));
    Ok(ended)
}
