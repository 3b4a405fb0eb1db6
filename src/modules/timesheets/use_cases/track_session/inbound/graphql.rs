use async_graphql::{Context, Object, Result as GqlResult};
use chrono::{NaiveDate, Weekday};

use crate::modules::timesheets::core::history::{DaySummary, PaymentFrequency, pay_period_range};
use crate::modules::timesheets::core::time_arithmetic::{
    WorkTarget, evaluate_work_target, format_duration_short, format_elapsed, format_hours_minutes,
    milliseconds_between,
};
use crate::shell::state::AppState;

const DAILY_TARGET_HOURS: u32 = 8;

#[derive(async_graphql::Enum, Clone, Copy, PartialEq, Eq)]
pub enum GqlPaymentFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl From<GqlPaymentFrequency> for PaymentFrequency {
    fn from(v: GqlPaymentFrequency) -> Self {
        match v {
            GqlPaymentFrequency::Weekly => PaymentFrequency::Weekly,
            GqlPaymentFrequency::Biweekly => PaymentFrequency::Biweekly,
            GqlPaymentFrequency::Monthly => PaymentFrequency::Monthly,
        }
    }
}

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlPayPeriod {
    pub from: String,
    pub to: String,
}

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlDaySummary {
    pub log_id: String,
    pub date: String,
    pub clocked_in_at: Option<String>,
    pub clocked_out_at: Option<String>,
    pub total_work: String,
    pub total_break: String,
    /// Short form of the work total, e.g. `7h 30m`.
    pub worked: String,
}

impl From<DaySummary> for GqlDaySummary {
    fn from(v: DaySummary) -> Self {
        Self {
            log_id: v.log_id,
            date: v.date.to_string(),
            clocked_in_at: v.clocked_in_at,
            clocked_out_at: v.clocked_out_at,
            total_work: format_hours_minutes(v.total_work_ms as f64),
            total_break: format_hours_minutes(v.total_break_ms as f64),
            worked: format_duration_short(v.total_work_ms),
        }
    }
}

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlDashboard {
    pub staff_id: String,
    pub selected_date: String,
    pub status: String,
    pub is_on_break: bool,
    pub current_segment_start: Option<String>,
    pub elapsed: Option<String>,
    pub clocked_in_at: Option<String>,
    pub total_work: String,
    pub total_break: String,
    /// Work beyond the daily target, e.g. `1 hour 5 minutes`.
    pub overtime: Option<String>,
    pub hours_this_week: String,
    pub week: Vec<GqlDaySummary>,
}

#[derive(Default)]
pub struct DashboardQuery;

#[Object]
impl DashboardQuery {
    /// The tracked session of a staff member, or null when they are not tracked.
    async fn dashboard(
        &self,
        context: &Context<'_>,
        staff_id: String,
    ) -> GqlResult<Option<GqlDashboard>> {
        let state = context.data_unchecked::<AppState>();
        let Some(coordinator) = state.sessions.get(&staff_id) else {
            return Ok(None);
        };

        let session = coordinator.session().await;
        let stats = coordinator.day_stats().await;
        let now = state.clock.now();

        Ok(Some(GqlDashboard {
            staff_id,
            selected_date: coordinator.selected_date().await.to_string(),
            status: session.status().as_str().to_string(),
            is_on_break: session.is_on_break,
            current_segment_start: session.current_segment_start.map(|t| t.to_rfc3339()),
            elapsed: session
                .current_segment_start
                .map(|start| format_elapsed(milliseconds_between(start, now))),
            clocked_in_at: stats.clocked_in_at,
            total_work: format_hours_minutes(stats.total_work_ms as f64),
            total_break: format_hours_minutes(stats.total_break_ms as f64),
            overtime: match evaluate_work_target(stats.total_work_ms, DAILY_TARGET_HOURS) {
                WorkTarget::Over(overtime) => Some(overtime),
                WorkTarget::Under | WorkTarget::Met => None,
            },
            hours_this_week: format_hours_minutes(
                coordinator.hours_worked_this_week().await as f64,
            ),
            week: coordinator
                .week_history()
                .await
                .into_iter()
                .map(Into::into)
                .collect(),
        }))
    }

    /// Inclusive pay period containing `date` (`YYYY-MM-DD`). `startDay` is a
    /// weekday such as `Mon` and defaults to Monday.
    async fn pay_period(
        &self,
        date: String,
        frequency: GqlPaymentFrequency,
        start_day: Option<String>,
    ) -> GqlResult<GqlPayPeriod> {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| async_graphql::Error::new(format!("invalid date: {date}")))?;
        let start_day = match start_day {
            None => Weekday::Mon,
            Some(raw) => raw
                .parse::<Weekday>()
                .map_err(|_| async_graphql::Error::new(format!("invalid weekday: {raw}")))?,
        };
        let period = pay_period_range(date, frequency.into(), start_day);
        Ok(GqlPayPeriod {
            from: period.from.to_string(),
            to: period.to.to_string(),
        })
    }
}
