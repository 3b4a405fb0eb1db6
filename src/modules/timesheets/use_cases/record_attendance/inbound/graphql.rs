use async_graphql::{Context, Object, Result as GqlResult};

use crate::modules::timesheets::use_cases::list_time_logs::inbound::graphql::{
    GqlBreakRecord, GqlTimeLog,
};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct AttendanceMutation;

#[Object]
impl AttendanceMutation {
    async fn clock_in(&self, context: &Context<'_>, staff_id: String) -> GqlResult<GqlTimeLog> {
        let state = context.data_unchecked::<AppState>();
        let entry = state.gateway.clock_in(&staff_id).await?;
        Ok(entry.into())
    }

    async fn clock_out(
        &self,
        context: &Context<'_>,
        staff_id: String,
        log_id: String,
    ) -> GqlResult<GqlTimeLog> {
        let state = context.data_unchecked::<AppState>();
        let entry = state.gateway.clock_out(&staff_id, &log_id).await?;
        Ok(entry.into())
    }

    async fn start_break(
        &self,
        context: &Context<'_>,
        staff_id: String,
        log_id: String,
        break_type_id: String,
    ) -> GqlResult<GqlBreakRecord> {
        let state = context.data_unchecked::<AppState>();
        let break_type = state
            .catalog
            .break_types()
            .await?
            .into_iter()
            .find(|t| t.id == break_type_id)
            .ok_or_else(|| async_graphql::Error::new(format!("unknown break type: {break_type_id}")))?;

        let record = state
            .gateway
            .start_break(&staff_id, &log_id, &break_type)
            .await?;
        Ok(record.into())
    }

    async fn end_break(
        &self,
        context: &Context<'_>,
        staff_id: String,
        log_id: String,
        break_id: String,
    ) -> GqlResult<GqlBreakRecord> {
        let state = context.data_unchecked::<AppState>();
        let record = state
            .gateway
            .end_break(&staff_id, &log_id, &break_id)
            .await?;
        Ok(record.into())
    }
}
