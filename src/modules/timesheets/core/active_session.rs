// Active session derivation.
//
// Purpose
// - Answer "am I clocked in, am I on break, and since when" for the selected
//   date, from the log history alone.
//
// Boundaries
// - Derived from scratch on every call; never patched in place.
// - Only today's entry can be live. Other dates are shown read-only.

use crate::modules::timesheets::core::day_log::{find_log_for_date, latest_ongoing_break};
use crate::modules::timesheets::core::time_log::{BreakRecord, TimeLogEntry};
use crate::shared::core::primitives::{Timestamp, day_of};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    NotClockedIn,
    ClockedIn,
    OnBreak,
    ClockedOut,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::NotClockedIn => "NOT_CLOCKED_IN",
            SessionStatus::ClockedIn => "CLOCKED_IN",
            SessionStatus::OnBreak => "ON_BREAK",
            SessionStatus::ClockedOut => "CLOCKED_OUT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ActiveSessionState {
    pub is_active: bool,
    pub is_on_break: bool,
    pub current_segment_start: Option<Timestamp>,
    pub current_break: Option<BreakRecord>,
    pub todays_log: Option<TimeLogEntry>,
}

impl ActiveSessionState {
    pub fn inactive(log: Option<TimeLogEntry>) -> Self {
        Self {
            todays_log: log,
            ..Self::default()
        }
    }

    pub fn status(&self) -> SessionStatus {
        match (self.is_active, self.is_on_break, &self.todays_log) {
            (true, true, _) => SessionStatus::OnBreak,
            (true, false, _) => SessionStatus::ClockedIn,
            (false, _, Some(log)) if !log.is_open() => SessionStatus::ClockedOut,
            (false, _, _) => SessionStatus::NotClockedIn,
        }
    }
}

/// Start of the work segment running since the last resume: the end of the
/// latest completed break, else the clock-in.
fn work_segment_start(entry: &TimeLogEntry, now: Timestamp) -> Timestamp {
    let resumed_at = entry.breaks.iter().filter_map(|b| b.end_time).max();
    match (resumed_at, entry.clock_in_time) {
        (Some(resumed), Some(clock_in)) => resumed.max(clock_in),
        (Some(resumed), None) => resumed,
        (None, Some(clock_in)) => clock_in,
        (None, None) => now,
    }
}

pub fn derive_session(
    logs: &[TimeLogEntry],
    selected_date: NaiveDate,
    now: Timestamp,
) -> ActiveSessionState {
    let entry = find_log_for_date(logs, selected_date);

    if selected_date != day_of(now) {
        return ActiveSessionState::inactive(entry.cloned());
    }

    let Some(entry) = entry else {
        return ActiveSessionState::inactive(None);
    };

    if !entry.is_open() {
        return ActiveSessionState::inactive(Some(entry.clone()));
    }

    match latest_ongoing_break(entry) {
        Some(ongoing) => ActiveSessionState {
            is_active: true,
            is_on_break: true,
            current_segment_start: Some(ongoing.start_time),
            current_break: Some(ongoing.clone()),
            todays_log: Some(entry.clone()),
        },
        None => ActiveSessionState {
            is_active: true,
            is_on_break: false,
            current_segment_start: Some(work_segment_start(entry, now)),
            current_break: None,
            todays_log: Some(entry.clone()),
        },
    }
}
