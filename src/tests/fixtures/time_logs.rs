// Shared test fixtures for time log entries.
// All fixture instants fall on the same UTC day, 2025-03-14, unless a test
// overrides the date.

use crate::modules::timesheets::core::time_log::{BreakRecord, BreakType, TimeLogEntry};
use crate::shared::core::primitives::Timestamp;
use chrono::{NaiveDate, TimeZone, Utc};
use std::fs;

pub const STAFF_ID: &str = "staff-fixed-0001";

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

/// An instant on the fixture day.
pub fn at(hour: u32, minute: u32, second: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, second)
        .unwrap()
}

/// An instant on an arbitrary day of March 2025.
pub fn on(day_of_month: u32, hour: u32, minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, day_of_month, hour, minute, 0)
        .unwrap()
}

pub fn coffee_break() -> BreakType {
    BreakType {
        id: "bt-coffee".to_string(),
        name: "Coffee break".to_string(),
        duration_minutes: 15,
        is_paid: true,
    }
}

pub fn long_break() -> BreakType {
    BreakType {
        id: "bt-long".to_string(),
        name: "Long break".to_string(),
        duration_minutes: 60,
        is_paid: false,
    }
}

pub struct TimeLogEntryBuilder {
    inner: TimeLogEntry,
}

impl Default for TimeLogEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TimeLogEntryBuilder {
    pub fn new() -> Self {
        let json_str = fs::read_to_string("./src/tests/fixtures/json/time_log_entry.json").unwrap();
        Self {
            inner: serde_json::from_str(&json_str).unwrap(),
        }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.id = v.into();
        self
    }

    pub fn staff_id(mut self, v: impl Into<String>) -> Self {
        self.inner.staff_id = v.into();
        self
    }

    pub fn date(mut self, v: NaiveDate) -> Self {
        self.inner.date = v;
        self
    }

    pub fn clock_in(mut self, v: Timestamp) -> Self {
        self.inner.date = v.date_naive();
        self.inner.clock_in_time = Some(v);
        self
    }

    pub fn clock_out(mut self, v: Timestamp) -> Self {
        self.inner.clock_out_time = Some(v);
        self
    }

    pub fn completed_break(mut self, start: Timestamp, end: Timestamp) -> Self {
        let id = format!("br-{}", self.inner.breaks.len() + 1);
        self.inner.breaks.push(BreakRecord {
            id,
            start_time: start,
            end_time: Some(end),
            break_type: coffee_break(),
            duration_ms: Some((end - start).num_milliseconds()),
        });
        self
    }

    pub fn ongoing_break(mut self, start: Timestamp) -> Self {
        let id = format!("br-{}", self.inner.breaks.len() + 1);
        self.inner.breaks.push(BreakRecord {
            id,
            start_time: start,
            end_time: None,
            break_type: coffee_break(),
            duration_ms: None,
        });
        self
    }

    pub fn total_work_ms(mut self, v: i64) -> Self {
        self.inner.total_work_ms = Some(v);
        self
    }

    pub fn build(self) -> TimeLogEntry {
        self.inner
    }
}

#[cfg(test)]
mod time_log_entry_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_delegates_to_new_and_parses_json() {
        let built = TimeLogEntryBuilder::default().build();
        assert_eq!(built.id, "log-fixed-0001");
        assert_eq!(built.staff_id, STAFF_ID);
        assert_eq!(built.date, day());
        assert_eq!(built.clock_in_time, None);
        assert!(built.breaks.is_empty());
    }

    #[rstest]
    fn clock_in_moves_the_entry_to_the_clock_in_day() {
        let built = TimeLogEntryBuilder::new().clock_in(on(10, 9, 0)).build();
        assert_eq!(built.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }
}
