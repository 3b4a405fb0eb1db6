// Session mutation coordinator for one staff member.
//
// Purpose
// - Run clock-in, clock-out, start-break and end-break against the timesheet
//   gateway and keep a cached log list plus the derived session in step.
//
// Responsibilities
// - Guard every mutation against the current session; a failed guard never
//   reaches the gateway.
// - Patch the cache with the gateway's answer, then refresh it from the source.
// - Drop refresh responses that were overtaken by a later write or refresh.
// - Report remote failures as notifications and leave state as it was.
//
// Concurrency
// - The state lock is synchronous and never held across an await.
// - One mutation at a time; a second one fails its guard while the first runs.
// - A mutation dropped mid-call (timeout, disconnect) frees its slot and
//   re-derives the session from the cache.

use crate::modules::timesheets::core::active_session::{ActiveSessionState, derive_session};
use crate::modules::timesheets::core::day_log::{DayStats, project_day};
use crate::modules::timesheets::core::history::{self, DaySummary};
use crate::modules::timesheets::core::ports::{
    BreakTypeCatalog, Clock, GatewayError, TimesheetGateway,
};
use crate::modules::timesheets::core::time_log::{BreakType, TimeLogEntry, upsert_entry};
use crate::modules::timesheets::use_cases::track_session::errors::{Precondition, SessionError};
use crate::modules::timesheets::use_cases::track_session::notifications::{
    Notifications, Severity,
};
use crate::shared::core::primitives::{StaffId, Timestamp, day_of};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The session derived right after the gateway's answer was patched in.
    Applied(ActiveSessionState),
    /// The selected date changed while the call was in flight. The cache was
    /// still patched, but the caller's view no longer matches.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied,
    Stale,
}

struct ViewState {
    logs: Vec<TimeLogEntry>,
    selected_date: NaiveDate,
    session: ActiveSessionState,
    view_generation: u64,
    cache_version: u64,
    mutating: bool,
}

impl ViewState {
    fn rederive(&mut self, now: Timestamp) -> ActiveSessionState {
        self.session = derive_session(&self.logs, self.selected_date, now);
        self.session.clone()
    }
}

/// The in-flight slot of one mutation. Dropping it unsettled undoes any
/// optimistic change by re-deriving the session from the cached logs.
struct InFlight<'a> {
    coordinator: &'a SessionCoordinator,
    operation: &'static str,
    generation: u64,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let coordinator = self.coordinator;
        let now = coordinator.clock.now();
        let mut state = coordinator.lock_state();
        state.mutating = false;
        if !self.settled {
            let session = state.rederive(now);
            coordinator.publish(session);
            debug!(staff_id = %coordinator.staff_id, operation = self.operation, "mutation released without a result");
        }
    }
}

pub struct SessionCoordinator {
    staff_id: StaffId,
    gateway: Arc<dyn TimesheetGateway>,
    catalog: Arc<dyn BreakTypeCatalog>,
    clock: Arc<dyn Clock>,
    notifications: Arc<Notifications>,
    state: Mutex<ViewState>,
    session_tx: watch::Sender<ActiveSessionState>,
}

impl SessionCoordinator {
    pub fn new(
        staff_id: impl Into<StaffId>,
        gateway: Arc<dyn TimesheetGateway>,
        catalog: Arc<dyn BreakTypeCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let today = day_of(clock.now());
        let (session_tx, _) = watch::channel(ActiveSessionState::default());
        Self {
            staff_id: staff_id.into(),
            gateway,
            catalog,
            clock,
            notifications: Arc::new(Notifications::new()),
            state: Mutex::new(ViewState {
                logs: Vec::new(),
                selected_date: today,
                session: ActiveSessionState::default(),
                view_generation: 0,
                cache_version: 0,
                mutating: false,
            }),
            session_tx,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn staff_id(&self) -> &str {
        &self.staff_id
    }

    pub fn notifications(&self) -> Arc<Notifications> {
        Arc::clone(&self.notifications)
    }

    /// Session updates, e.g. for a live timer.
    pub fn subscribe(&self) -> watch::Receiver<ActiveSessionState> {
        self.session_tx.subscribe()
    }

    fn publish(&self, session: ActiveSessionState) {
        self.session_tx.send_if_modified(|current| {
            if *current == session {
                return false;
            }
            *current = session;
            true
        });
    }

    pub async fn session(&self) -> ActiveSessionState {
        self.lock_state().session.clone()
    }

    pub async fn selected_date(&self) -> NaiveDate {
        self.lock_state().selected_date
    }

    pub async fn logs(&self) -> Vec<TimeLogEntry> {
        self.lock_state().logs.clone()
    }

    pub async fn is_mutating(&self) -> bool {
        self.lock_state().mutating
    }

    pub async fn day_stats(&self) -> DayStats {
        let now = self.clock.now();
        let state = self.lock_state();
        project_day(&state.logs, state.selected_date, now)
    }

    pub async fn week_history(&self) -> Vec<DaySummary> {
        let now = self.clock.now();
        let state = self.lock_state();
        history::week_history(&state.logs, state.selected_date, now)
    }

    pub async fn hours_worked_this_week(&self) -> i64 {
        let now = self.clock.now();
        let state = self.lock_state();
        history::hours_worked_this_week(&state.logs, state.selected_date, now)
    }

    pub async fn break_types(&self) -> Result<Vec<BreakType>, SessionError> {
        self.catalog.break_types().await.map_err(|err| {
            self.notifications
                .push(Severity::Error, "Could not load break types", Some(err.to_string()));
            SessionError::Remote(err)
        })
    }

    /// Switch the displayed date. Mutations still in flight will report
    /// `Superseded` when they complete.
    pub async fn select_date(&self, date: NaiveDate) -> ActiveSessionState {
        let now = self.clock.now();
        let mut state = self.lock_state();
        state.selected_date = date;
        state.view_generation += 1;
        let session = state.rederive(now);
        self.publish(session.clone());
        debug!(staff_id = %self.staff_id, %date, "selected date");
        session
    }

    /// Reload the log list from the gateway and re-derive the session.
    pub async fn refresh(&self) -> Result<RefreshOutcome, SessionError> {
        let version = {
            let mut state = self.lock_state();
            state.cache_version += 1;
            state.cache_version
        };

        let logs = self.gateway.list_time_logs(&self.staff_id, None).await?;

        let now = self.clock.now();
        let mut state = self.lock_state();
        if state.cache_version != version {
            debug!(staff_id = %self.staff_id, version, "discarding stale time log response");
            return Ok(RefreshOutcome::Stale);
        }
        state.logs = logs;
        let session = state.rederive(now);
        self.publish(session);
        Ok(RefreshOutcome::Applied)
    }

    /// Refresh on a fixed period until the handle is aborted. The first refresh
    /// runs immediately. `period` must be non-zero.
    pub fn spawn_background_refresh(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = coordinator.refresh().await {
                    warn!(staff_id = %coordinator.staff_id, error = %err, "background refresh failed");
                }
            }
        })
    }

    /// Runs the guard and takes the in-flight slot. Every accepted mutation
    /// bumps the cache version, so a refresh issued before it cannot land after
    /// an optimistic write.
    fn begin<T>(
        &self,
        operation: &'static str,
        guard: impl FnOnce(&ViewState, Timestamp) -> Result<T, Precondition>,
    ) -> Result<(T, InFlight<'_>), SessionError> {
        let now = self.clock.now();
        let mut state = self.lock_state();
        let checked = if state.mutating {
            Err(Precondition::MutationInFlight)
        } else if state.selected_date != day_of(now) {
            Err(Precondition::NotToday)
        } else {
            guard(&*state, now)
        };
        let target = checked.inspect_err(|precondition| {
            debug!(staff_id = %self.staff_id, operation, %precondition, "mutation skipped");
        })?;
        state.mutating = true;
        state.cache_version += 1;
        let generation = state.view_generation;
        drop(state);

        Ok((
            target,
            InFlight {
                coordinator: self,
                operation,
                generation,
                settled: false,
            },
        ))
    }

    fn fail(&self, permit: InFlight<'_>, title: &str, err: GatewayError) -> SessionError {
        drop(permit);
        warn!(staff_id = %self.staff_id, error = %err, "{title}");
        self.notifications
            .push(Severity::Error, title, Some(err.to_string()));
        SessionError::Remote(err)
    }

    async fn complete(
        &self,
        permit: InFlight<'_>,
        patch: impl FnOnce(&mut Vec<TimeLogEntry>),
    ) -> MutationOutcome {
        let now = self.clock.now();
        let outcome = {
            let mut state = self.lock_state();
            patch(&mut state.logs);
            state.cache_version += 1;
            state.mutating = false;
            let session = state.rederive(now);
            self.publish(session.clone());
            if state.view_generation == permit.generation {
                MutationOutcome::Applied(session)
            } else {
                MutationOutcome::Superseded
            }
        };
        permit.settle();

        if let Err(err) = self.refresh().await {
            warn!(staff_id = %self.staff_id, error = %err, "refresh after mutation failed");
        }
        outcome
    }

    pub async fn clock_in(&self) -> Result<MutationOutcome, SessionError> {
        let ((), permit) = self
            .begin("clock_in", |state, _| {
                if state.session.is_active {
                    return Err(Precondition::AlreadyClockedIn);
                }
                if state.session.todays_log.as_ref().is_some_and(|log| !log.is_open()) {
                    return Err(Precondition::DayClosed);
                }
                Ok(())
            })?;

        match self.gateway.clock_in(&self.staff_id).await {
            Ok(entry) => {
                info!(staff_id = %self.staff_id, log_id = %entry.id, "clocked in");
                Ok(self.complete(permit, |logs| upsert_entry(logs, entry)).await)
            }
            Err(err) => Err(self.fail(permit, "Clock in failed", err)),
        }
    }

    pub async fn clock_out(&self) -> Result<MutationOutcome, SessionError> {
        let (log_id, permit) = self
            .begin("clock_out", |state, _| {
                let session = &state.session;
                if !session.is_active {
                    return Err(Precondition::NotClockedIn);
                }
                if session.is_on_break {
                    return Err(Precondition::OnBreak);
                }
                session
                    .todays_log
                    .as_ref()
                    .map(|log| log.id.clone())
                    .ok_or(Precondition::NotClockedIn)
            })?;

        match self.gateway.clock_out(&self.staff_id, &log_id).await {
            Ok(entry) => {
                info!(staff_id = %self.staff_id, %log_id, "clocked out");
                self.notifications.push(
                    Severity::Success,
                    "Clock out successful",
                    Some("You've successfully clocked out".to_string()),
                );
                Ok(self.complete(permit, |logs| upsert_entry(logs, entry)).await)
            }
            Err(err) => Err(self.fail(permit, "Clock out failed", err)),
        }
    }

    /// Starts a break of the selected type. The session shows the break before
    /// the gateway answers; a failure re-derives it from the cache.
    pub async fn start_break(
        &self,
        break_type: Option<&BreakType>,
    ) -> Result<MutationOutcome, SessionError> {
        let ((log_id, break_type), permit) = self
            .begin("start_break", |state, _| {
                let session = &state.session;
                if !session.is_active {
                    return Err(Precondition::NotClockedIn);
                }
                if session.is_on_break {
                    return Err(Precondition::AlreadyOnBreak);
                }
                let Some(break_type) = break_type else {
                    return Err(Precondition::NoBreakTypeSelected);
                };
                let log_id = session
                    .todays_log
                    .as_ref()
                    .map(|log| log.id.clone())
                    .ok_or(Precondition::NotClockedIn)?;
                Ok((log_id, break_type.clone()))
            })?;

        {
            let now = self.clock.now();
            let mut state = self.lock_state();
            state.session = ActiveSessionState {
                is_on_break: true,
                current_segment_start: Some(now),
                current_break: None,
                ..state.session.clone()
            };
            self.publish(state.session.clone());
        }

        match self
            .gateway
            .start_break(&self.staff_id, &log_id, &break_type)
            .await
        {
            Ok(record) => {
                info!(staff_id = %self.staff_id, %log_id, break_id = %record.id, "break started");
                Ok(self
                    .complete(permit, |logs| {
                        if let Some(entry) = logs.iter_mut().find(|e| e.id == log_id) {
                            entry.upsert_break(record);
                        }
                    })
                    .await)
            }
            Err(err) => Err(self.fail(permit, "Start break failed", err)),
        }
    }

    pub async fn end_break(&self) -> Result<MutationOutcome, SessionError> {
        let ((log_id, break_id), permit) = self
            .begin("end_break", |state, _| {
                let session = &state.session;
                if !session.is_active {
                    return Err(Precondition::NotClockedIn);
                }
                if !session.is_on_break {
                    return Err(Precondition::NotOnBreak);
                }
                match (&session.todays_log, &session.current_break) {
                    (Some(log), Some(current)) => Ok((log.id.clone(), current.id.clone())),
                    _ => Err(Precondition::NotOnBreak),
                }
            })?;

        match self
            .gateway
            .end_break(&self.staff_id, &log_id, &break_id)
            .await
        {
            Ok(record) => {
                info!(staff_id = %self.staff_id, %log_id, %break_id, "break ended");
                Ok(self
                    .complete(permit, |logs| {
                        if let Some(entry) = logs.iter_mut().find(|e| e.id == log_id) {
                            entry.upsert_break(record);
                        }
                    })
                    .await)
            }
            Err(err) => Err(self.fail(permit, "End break failed", err)),
        }
    }
}
