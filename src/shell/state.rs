use crate::modules::timesheets::adapters::outbound::in_memory_timesheets::InMemoryTimesheets;
use crate::modules::timesheets::core::ports::{BreakTypeCatalog, Clock, TimesheetGateway};
use crate::modules::timesheets::use_cases::track_session::coordinator::SessionCoordinator;
use crate::shared::core::primitives::StaffId;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn TimesheetGateway>,
    pub catalog: Arc<dyn BreakTypeCatalog>,
    pub clock: Arc<dyn Clock>,
    /// Tracked sessions of the staff members known at startup.
    pub sessions: Arc<HashMap<StaffId, Arc<SessionCoordinator>>>,
}

impl AppState {
    pub fn in_memory(backend: Arc<InMemoryTimesheets>) -> Self {
        let clock = backend.clock();
        Self {
            gateway: backend.clone(),
            catalog: backend,
            clock,
            sessions: Arc::new(HashMap::new()),
        }
    }

    /// One coordinator per staff id, sharing this state's gateway and clock.
    pub fn tracking(mut self, staff_ids: &[StaffId]) -> Self {
        let sessions = staff_ids
            .iter()
            .map(|id| {
                let coordinator = SessionCoordinator::new(
                    id.clone(),
                    self.gateway.clone(),
                    self.catalog.clone(),
                    self.clock.clone(),
                );
                (id.clone(), Arc::new(coordinator))
            })
            .collect();
        self.sessions = Arc::new(sessions);
        self
    }
}
