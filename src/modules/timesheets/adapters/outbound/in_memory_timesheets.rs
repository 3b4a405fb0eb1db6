// In memory timesheet backend.
//
// Purpose
// - Serve the gateway and catalog ports without a database, for local
//   development, the HTTP and GraphQL shell, and tests.
//
// Responsibilities
// - Keep each staff member's entries in a map keyed by staff id.
// - Run every transition through the pure deciders before storing it.
// - Simulate an unreachable or slow backend on request.

use crate::modules::timesheets::core::decide::{
    DecideError, decide_clock_in, decide_clock_out, decide_end_break, decide_start_break,
};
use crate::modules::timesheets::core::ports::{
    BreakTypeCatalog, Clock, GatewayError, TimesheetGateway,
};
use crate::modules::timesheets::core::time_arithmetic::sum_break_durations;
use crate::modules::timesheets::core::time_log::{
    BreakRecord, BreakType, TimeLogEntry, upsert_entry,
};
use crate::shared::core::primitives::{DateRange, StaffId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

impl From<DecideError> for GatewayError {
    fn from(err: DecideError) -> Self {
        match err {
            DecideError::LogNotFound(_) | DecideError::BreakNotOngoing(_) => {
                GatewayError::NotFound(err.to_string())
            }
            _ => GatewayError::Rejected(err.to_string()),
        }
    }
}

pub fn default_break_types() -> Vec<BreakType> {
    vec![
        BreakType {
            id: "recess".to_string(),
            name: "Recess".to_string(),
            duration_minutes: 10,
            is_paid: true,
        },
        BreakType {
            id: "coffee-break".to_string(),
            name: "Coffee break".to_string(),
            duration_minutes: 15,
            is_paid: true,
        },
        BreakType {
            id: "long-break".to_string(),
            name: "Long break".to_string(),
            duration_minutes: 60,
            is_paid: false,
        },
    ]
}

pub struct InMemoryTimesheets {
    staff: RwLock<HashMap<StaffId, Vec<TimeLogEntry>>>,
    break_types: Vec<BreakType>,
    clock: Arc<dyn Clock>,
    is_offline: AtomicBool,
    delay_ms: AtomicU64,
    calls: AtomicUsize,
}

impl InMemoryTimesheets {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            staff: RwLock::new(HashMap::new()),
            break_types: default_break_types(),
            clock,
            is_offline: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_staff(mut self, staff_id: &str, entries: Vec<TimeLogEntry>) -> Self {
        self.staff.get_mut().insert(staff_id.to_string(), entries);
        self
    }

    /// Make a staff member known with an empty history. Existing entries are kept.
    pub async fn register_staff(&self, staff_id: &str) {
        self.staff
            .write()
            .await
            .entry(staff_id.to_string())
            .or_default();
    }

    pub async fn seed(&self, staff_id: &str, entries: Vec<TimeLogEntry>) {
        self.staff
            .write()
            .await
            .insert(staff_id.to_string(), entries);
    }

    pub async fn entries(&self, staff_id: &str) -> Vec<TimeLogEntry> {
        self.staff
            .read()
            .await
            .get(staff_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn set_delay_ms(&self, ms: u64) {
        self.delay_ms.store(ms, Ordering::SeqCst);
    }

    /// Number of gateway calls received, including failed ones.
    pub fn remote_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, operation: &str) -> Result<(), GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.is_offline.load(Ordering::SeqCst) {
            warn!(operation, "timesheet backend offline");
            return Err(GatewayError::Backend("Timesheet backend offline".into()));
        }
        Ok(())
    }
}

fn unknown_staff(staff_id: &str) -> GatewayError {
    GatewayError::NotFound(format!("staff {staff_id}"))
}

#[async_trait]
impl TimesheetGateway for InMemoryTimesheets {
    async fn list_time_logs(
        &self,
        staff_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<TimeLogEntry>, GatewayError> {
        self.enter("list_time_logs").await?;
        let guard = self.staff.read().await;
        let entries = guard.get(staff_id).ok_or_else(|| unknown_staff(staff_id))?;

        let mut logs: Vec<TimeLogEntry> = entries
            .iter()
            .filter(|e| range.is_none_or(|r| r.contains(e.date)))
            .cloned()
            .collect();
        logs.sort_by_key(|e| e.date);
        debug!(staff_id, count = logs.len(), "listed time logs");
        Ok(logs)
    }

    async fn clock_in(&self, staff_id: &str) -> Result<TimeLogEntry, GatewayError> {
        self.enter("clock_in").await?;
        let mut guard = self.staff.write().await;
        let entries = guard
            .get_mut(staff_id)
            .ok_or_else(|| unknown_staff(staff_id))?;

        let entry = decide_clock_in(
            entries,
            staff_id,
            Uuid::now_v7().to_string(),
            self.clock.now(),
        )?;
        entries.push(entry.clone());
        info!(staff_id, log_id = %entry.id, "clocked in");
        Ok(entry)
    }

    async fn clock_out(&self, staff_id: &str, log_id: &str) -> Result<TimeLogEntry, GatewayError> {
        self.enter("clock_out").await?;
        let mut guard = self.staff.write().await;
        let entries = guard
            .get_mut(staff_id)
            .ok_or_else(|| unknown_staff(staff_id))?;

        let closed = decide_clock_out(entries, log_id, self.clock.now())?;
        upsert_entry(entries, closed.clone());
        info!(
            staff_id,
            log_id,
            total_work_ms = closed.total_work_ms,
            "clocked out"
        );
        Ok(closed)
    }

    async fn start_break(
        &self,
        staff_id: &str,
        log_id: &str,
        break_type: &BreakType,
    ) -> Result<BreakRecord, GatewayError> {
        self.enter("start_break").await?;
        let mut guard = self.staff.write().await;
        let entries = guard
            .get_mut(staff_id)
            .ok_or_else(|| unknown_staff(staff_id))?;

        let record = decide_start_break(
            entries,
            log_id,
            Uuid::now_v7().to_string(),
            break_type,
            self.clock.now(),
        )?;
        if let Some(entry) = entries.iter_mut().find(|e| e.id == log_id) {
            entry.upsert_break(record.clone());
        }
        info!(staff_id, log_id, break_id = %record.id, break_type = %break_type.name, "break started");
        Ok(record)
    }

    async fn end_break(
        &self,
        staff_id: &str,
        log_id: &str,
        break_id: &str,
    ) -> Result<BreakRecord, GatewayError> {
        self.enter("end_break").await?;
        let mut guard = self.staff.write().await;
        let entries = guard
            .get_mut(staff_id)
            .ok_or_else(|| unknown_staff(staff_id))?;

        let ended = decide_end_break(entries, log_id, break_id, self.clock.now())?;
        if let Some(entry) = entries.iter_mut().find(|e| e.id == log_id) {
            entry.upsert_break(ended.clone());
            entry.total_break_ms = Some(sum_break_durations(&entry.breaks));
        }
        info!(staff_id, log_id, break_id, duration_ms = ended.duration_ms, "break ended");
        Ok(ended)
    }
}

#[async_trait]
impl BreakTypeCatalog for InMemoryTimesheets {
    async fn break_types(&self) -> Result<Vec<BreakType>, GatewayError> {
        self.enter("break_types").await?;
        Ok(self.break_types.clone())
    }
}
