// Attendance records as served by the timesheet backend.
//
// Purpose
// - One TimeLogEntry per staff member and calendar day, with its breaks.
//
// Notes
// - Totals on the entry are derived values. They are authoritative only once the
//   entry is closed; open entries are always recomputed from timestamps.

use crate::shared::core::primitives::{StaffId, Timestamp};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BreakType {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub is_paid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BreakRecord {
    pub id: String,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub break_type: BreakType,
    pub duration_ms: Option<i64>,
}

impl BreakRecord {
    pub fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeLogEntry {
    pub id: String,
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub clock_in_time: Option<Timestamp>,
    pub clock_out_time: Option<Timestamp>,
    #[serde(default)]
    pub breaks: Vec<BreakRecord>,
    pub total_work_ms: Option<i64>,
    pub total_break_ms: Option<i64>,
}

impl TimeLogEntry {
    pub fn is_open(&self) -> bool {
        self.clock_out_time.is_none()
    }

    /// Breaks without an end time, in insertion order.
    pub fn ongoing_breaks(&self) -> impl Iterator<Item = &BreakRecord> {
        self.breaks.iter().filter(|b| b.is_ongoing())
    }

    pub fn has_ongoing_break(&self) -> bool {
        self.ongoing_breaks().next().is_some()
    }

    /// Replace the break with the same id, or append it.
    pub fn upsert_break(&mut self, record: BreakRecord) {
        match self.breaks.iter_mut().find(|b| b.id == record.id) {
            Some(existing) => *existing = record,
            None => self.breaks.push(record),
        }
    }
}

/// Replace the entry with the same id, or append it.
pub fn upsert_entry(logs: &mut Vec<TimeLogEntry>, entry: TimeLogEntry) {
    match logs.iter_mut().find(|log| log.id == entry.id) {
        Some(existing) => *existing = entry,
        None => logs.push(entry),
    }
}
