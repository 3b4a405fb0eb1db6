use chrono::{DateTime, NaiveDate, Utc};

/// Instants are UTC everywhere; calendar days are derived with `date_naive`.
pub type Timestamp = DateTime<Utc>;

pub type StaffId = String;

/// The calendar day an instant falls on.
pub fn day_of(instant: Timestamp) -> NaiveDate {
    instant.date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Both ends are inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}
