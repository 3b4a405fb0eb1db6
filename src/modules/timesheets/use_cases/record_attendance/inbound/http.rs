use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::modules::timesheets::core::ports::GatewayError;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct StartBreakBody {
    pub break_type_id: String,
}

pub fn gateway_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
        GatewayError::Rejected(_) => StatusCode::CONFLICT,
        GatewayError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn handle_clock_in(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
) -> impl IntoResponse {
    match state.gateway.clock_in(&staff_id).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(err) => gateway_status(&err).into_response(),
    }
}

pub async fn handle_clock_out(
    State(state): State<AppState>,
    Path((staff_id, log_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.gateway.clock_out(&staff_id, &log_id).await {
        Ok(entry) => Json(entry).into_response(),
        Err(err) => gateway_status(&err).into_response(),
    }
}

pub async fn handle_start_break(
    State(state): State<AppState>,
    Path((staff_id, log_id)): Path<(String, String)>,
    body: Result<Json<StartBreakBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let break_type = match state.catalog.break_types().await {
        Ok(types) => types.into_iter().find(|t| t.id == body.break_type_id),
        Err(err) => return gateway_status(&err).into_response(),
    };
    let Some(break_type) = break_type else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };

    match state
        .gateway
        .start_break(&staff_id, &log_id, &break_type)
        .await
    {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => gateway_status(&err).into_response(),
    }
}

pub async fn handle_end_break(
    State(state): State<AppState>,
    Path((staff_id, log_id, break_id)): Path<(String, String, String)>,
) -> impl IntoResponse {
    match state.gateway.end_break(&staff_id, &log_id, &break_id).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => gateway_status(&err).into_response(),
    }
}

#[cfg(test)]
mod record_attendance_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::modules::timesheets::adapters::outbound::in_memory_timesheets::InMemoryTimesheets;
    use crate::modules::timesheets::core::ports::FixedClock;
    use crate::modules::timesheets::core::time_log::{BreakRecord, TimeLogEntry};
    use crate::shell::state::AppState;
    use crate::tests::fixtures::time_logs::{STAFF_ID, TimeLogEntryBuilder, at};

    use super::{handle_clock_in, handle_clock_out, handle_end_break, handle_start_break};

    fn make_test_state(entries: Vec<TimeLogEntry>) -> (AppState, Arc<InMemoryTimesheets>) {
        let backend = Arc::new(
            InMemoryTimesheets::new(Arc::new(FixedClock::new(at(12, 0, 0))))
                .with_staff(STAFF_ID, entries),
        );
        (AppState::in_memory(backend.clone()), backend)
    }

    fn open_since_nine() -> Vec<TimeLogEntry> {
        vec![TimeLogEntryBuilder::new().clock_in(at(9, 0, 0)).build()]
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/staff/{staff_id}/clock-in", post(handle_clock_in))
            .route(
                "/staff/{staff_id}/time-logs/{log_id}/clock-out",
                post(handle_clock_out),
            )
            .route(
                "/staff/{staff_id}/time-logs/{log_id}/breaks",
                post(handle_start_break),
            )
            .route(
                "/staff/{staff_id}/time-logs/{log_id}/breaks/{break_id}/end",
                post(handle_end_break),
            )
            .with_state(state)
    }

    fn post_json(uri: String, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: String) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn it_should_return_201_with_the_new_time_log_on_clock_in() {
        let (state, _) = make_test_state(vec![]);
        let response = app(state)
            .oneshot(post_empty(format!("/staff/{STAFF_ID}/clock-in")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let entry: TimeLogEntry = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(entry.clock_in_time, Some(at(12, 0, 0)));
        assert!(entry.is_open());
    }

    #[tokio::test]
    async fn it_should_return_409_when_already_clocked_in() {
        let (state, _) = make_test_state(open_since_nine());
        let response = app(state)
            .oneshot(post_empty(format!("/staff/{STAFF_ID}/clock-in")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn it_should_return_the_closed_time_log_on_clock_out() {
        let (state, _) = make_test_state(open_since_nine());
        let response = app(state)
            .oneshot(post_empty(format!(
                "/staff/{STAFF_ID}/time-logs/log-fixed-0001/clock-out"
            )))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let entry: TimeLogEntry = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(entry.total_work_ms, Some(3 * 3_600_000));
    }

    #[tokio::test]
    async fn it_should_return_404_when_clocking_out_an_unknown_log() {
        let (state, _) = make_test_state(open_since_nine());
        let response = app(state)
            .oneshot(post_empty(format!("/staff/{STAFF_ID}/time-logs/missing/clock-out")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn it_should_start_and_end_a_break() {
        let (state, backend) = make_test_state(open_since_nine());
        let router = app(state);

        let response = router
            .clone()
            .oneshot(post_json(
                format!("/staff/{STAFF_ID}/time-logs/log-fixed-0001/breaks"),
                r#"{"break_type_id":"coffee-break"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let started: BreakRecord = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(started.break_type.name, "Coffee break");

        let response = router
            .oneshot(post_empty(format!(
                "/staff/{STAFF_ID}/time-logs/log-fixed-0001/breaks/{}/end",
                started.id
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!backend.entries(STAFF_ID).await[0].has_ongoing_break());
    }

    #[tokio::test]
    async fn it_should_return_422_for_an_unknown_break_type() {
        let (state, _) = make_test_state(open_since_nine());
        let response = app(state)
            .oneshot(post_json(
                format!("/staff/{STAFF_ID}/time-logs/log-fixed-0001/breaks"),
                r#"{"break_type_id":"siesta"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn it_should_return_422_on_invalid_json() {
        let (state, _) = make_test_state(open_since_nine());
        let response = app(state)
            .oneshot(post_json(
                format!("/staff/{STAFF_ID}/time-logs/log-fixed-0001/breaks"),
                "not-json",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn it_should_return_500_when_the_backend_is_offline() {
        let (state, backend) = make_test_state(vec![]);
        backend.toggle_offline();
        let response = app(state)
            .oneshot(post_empty(format!("/staff/{STAFF_ID}/clock-in")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
