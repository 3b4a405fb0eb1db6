// Ports define what the timesheet core needs from the outside world.
//
// Purpose
// - Time-log retrieval, the four attendance mutations, the break type catalog
//   and the clock, as traits.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits.
//
// Testing guidance
// - Use the in memory backend and FixedClock for deterministic tests.

use crate::modules::timesheets::core::time_log::{BreakRecord, BreakType, TimeLogEntry};
use crate::shared::core::primitives::{DateRange, Timestamp};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait TimesheetGateway: Send + Sync {
    async fn list_time_logs(
        &self,
        staff_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<TimeLogEntry>, GatewayError>;

    async fn clock_in(&self, staff_id: &str) -> Result<TimeLogEntry, GatewayError>;

    async fn clock_out(&self, staff_id: &str, log_id: &str) -> Result<TimeLogEntry, GatewayError>;

    async fn start_break(
        &self,
        staff_id: &str,
        log_id: &str,
        break_type: &BreakType,
    ) -> Result<BreakRecord, GatewayError>;

    async fn end_break(
        &self,
        staff_id: &str,
        log_id: &str,
        break_id: &str,
    ) -> Result<BreakRecord, GatewayError>;
}

#[async_trait]
pub trait BreakTypeCatalog: Send + Sync {
    async fn break_types(&self) -> Result<Vec<BreakType>, GatewayError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<Timestamp>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
