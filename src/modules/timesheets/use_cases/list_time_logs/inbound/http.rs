use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::modules::timesheets::use_cases::record_attendance::inbound::http::gateway_status;
use crate::shared::core::primitives::DateRange;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct ListTimeLogsParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ListTimeLogsParams {
    /// `None` when neither end is given; a missing end is open.
    fn range(&self) -> Option<DateRange> {
        match (self.from, self.to) {
            (None, None) => None,
            (from, to) => Some(DateRange::new(
                from.unwrap_or(NaiveDate::MIN),
                to.unwrap_or(NaiveDate::MAX),
            )),
        }
    }
}

pub async fn handle(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    Query(params): Query<ListTimeLogsParams>,
) -> impl IntoResponse {
    let range = params.range();
    if range.is_some_and(|r| r.from > r.to) {
        return StatusCode::BAD_REQUEST.into_response();
    }

    match state.gateway.list_time_logs(&staff_id, range).await {
        Ok(logs) => Json(logs).into_response(),
        Err(err) => gateway_status(&err).into_response(),
    }
}

pub async fn handle_break_types(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog.break_types().await {
        Ok(types) => Json(types).into_response(),
        Err(err) => gateway_status(&err).into_response(),
    }
}

#[cfg(test)]
mod list_time_logs_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::modules::timesheets::adapters::outbound::in_memory_timesheets::InMemoryTimesheets;
    use crate::modules::timesheets::core::ports::FixedClock;
    use crate::modules::timesheets::core::time_log::TimeLogEntry;
    use crate::shell::state::AppState;
    use crate::tests::fixtures::time_logs::{STAFF_ID, TimeLogEntryBuilder, at, on};

    use super::{handle, handle_break_types};

    fn make_test_state() -> (AppState, Arc<InMemoryTimesheets>) {
        let logs = vec![
            TimeLogEntryBuilder::new()
                .id("log-10")
                .clock_in(on(10, 9, 0))
                .clock_out(on(10, 17, 0))
                .build(),
            TimeLogEntryBuilder::new().id("log-14").clock_in(at(9, 0, 0)).build(),
        ];
        let backend = Arc::new(
            InMemoryTimesheets::new(Arc::new(FixedClock::new(at(12, 0, 0))))
                .with_staff(STAFF_ID, logs),
        );
        (AppState::in_memory(backend.clone()), backend)
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/staff/{staff_id}/time-logs", get(handle))
            .route("/break-types", get(handle_break_types))
            .with_state(state)
    }

    async fn get_logs(uri: &str) -> (StatusCode, Option<Vec<TimeLogEntry>>) {
        let (state, _) = make_test_state();
        let response = app(state)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).ok())
    }

    #[tokio::test]
    async fn it_should_return_all_time_logs_of_a_staff_member() {
        let (status, logs) = get_logs(&format!("/staff/{STAFF_ID}/time-logs")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<String> = logs.unwrap().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["log-10", "log-14"]);
    }

    #[tokio::test]
    async fn it_should_filter_by_date_range() {
        let (status, logs) =
            get_logs(&format!("/staff/{STAFF_ID}/time-logs?from=2025-03-12&to=2025-03-14")).await;
        assert_eq!(status, StatusCode::OK);
        let logs = logs.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, "log-14");
    }

    #[tokio::test]
    async fn it_should_treat_a_missing_range_end_as_open() {
        let (_, logs) = get_logs(&format!("/staff/{STAFF_ID}/time-logs?to=2025-03-11")).await;
        assert_eq!(logs.unwrap()[0].id, "log-10");
    }

    #[tokio::test]
    async fn it_should_return_400_for_an_inverted_range() {
        let (status, _) =
            get_logs(&format!("/staff/{STAFF_ID}/time-logs?from=2025-03-14&to=2025-03-01")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn it_should_return_404_for_an_unknown_staff_member() {
        let (status, _) = get_logs("/staff/nobody/time-logs").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn it_should_return_500_when_the_backend_is_offline() {
        let (state, backend) = make_test_state();
        backend.toggle_offline();
        let response = app(state)
            .oneshot(Request::get("/break-types").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn it_should_list_break_types() {
        let (state, _) = make_test_state();
        let response = app(state)
            .oneshot(Request::get("/break-types").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 3);
        assert_eq!(json[0]["name"], "Recess");
    }
}
