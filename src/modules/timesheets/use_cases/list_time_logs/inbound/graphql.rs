use async_graphql::{Context, Object, Result as GqlResult};
use chrono::NaiveDate;

use crate::modules::timesheets::core::time_log::{BreakRecord, BreakType, TimeLogEntry};
use crate::shared::core::primitives::DateRange;
use crate::shell::state::AppState;

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlBreakType {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub is_paid: bool,
}

impl From<BreakType> for GqlBreakType {
    fn from(v: BreakType) -> Self {
        Self {
            id: v.id,
            name: v.name,
            duration_minutes: v.duration_minutes,
            is_paid: v.is_paid,
        }
    }
}

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlBreakRecord {
    pub id: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub break_type: GqlBreakType,
    pub duration_ms: Option<i64>,
}

impl From<BreakRecord> for GqlBreakRecord {
    fn from(v: BreakRecord) -> Self {
        Self {
            id: v.id,
            start_time: v.start_time.to_rfc3339(),
            end_time: v.end_time.map(|t| t.to_rfc3339()),
            break_type: v.break_type.into(),
            duration_ms: v.duration_ms,
        }
    }
}

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlTimeLog {
    pub id: String,
    pub staff_id: String,
    pub date: String,
    pub clock_in_time: Option<String>,
    pub clock_out_time: Option<String>,
    pub breaks: Vec<GqlBreakRecord>,
    pub total_work_ms: Option<i64>,
    pub total_break_ms: Option<i64>,
}

impl From<TimeLogEntry> for GqlTimeLog {
    fn from(v: TimeLogEntry) -> Self {
        Self {
            id: v.id,
            staff_id: v.staff_id,
            date: v.date.to_string(),
            clock_in_time: v.clock_in_time.map(|t| t.to_rfc3339()),
            clock_out_time: v.clock_out_time.map(|t| t.to_rfc3339()),
            breaks: v.breaks.into_iter().map(Into::into).collect(),
            total_work_ms: v.total_work_ms,
            total_break_ms: v.total_break_ms,
        }
    }
}

fn parse_date(value: Option<String>, bound: NaiveDate) -> GqlResult<NaiveDate> {
    match value {
        None => Ok(bound),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|_| async_graphql::Error::new(format!("invalid date: {raw}"))),
    }
}

#[derive(Default)]
pub struct TimeLogsQuery;

#[Object]
impl TimeLogsQuery {
    /// Dates are `YYYY-MM-DD`; both ends are inclusive and optional.
    async fn time_logs(
        &self,
        context: &Context<'_>,
        staff_id: String,
        from: Option<String>,
        to: Option<String>,
    ) -> GqlResult<Vec<GqlTimeLog>> {
        let state = context.data_unchecked::<AppState>();
        let range = if from.is_none() && to.is_none() {
            None
        } else {
            Some(DateRange::new(
                parse_date(from, NaiveDate::MIN)?,
                parse_date(to, NaiveDate::MAX)?,
            ))
        };
        let logs = state.gateway.list_time_logs(&staff_id, range).await?;
        Ok(logs.into_iter().map(Into::into).collect())
    }

    async fn break_types(&self, context: &Context<'_>) -> GqlResult<Vec<GqlBreakType>> {
        let state = context.data_unchecked::<AppState>();
        let types = state.catalog.break_types().await?;
        Ok(types.into_iter().map(Into::into).collect())
    }
}
