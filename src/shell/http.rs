use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::modules::timesheets::use_cases::list_time_logs::inbound::http as list_http;
use crate::modules::timesheets::use_cases::record_attendance::inbound::http as attendance_http;
use crate::shell::graphql::{build_schema, graphiql, graphql};
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    let schema = build_schema(state.clone());

    Router::new()
        .route("/staff/{staff_id}/time-logs", get(list_http::handle))
        .route("/break-types", get(list_http::handle_break_types))
        .route(
            "/staff/{staff_id}/clock-in",
            post(attendance_http::handle_clock_in),
        )
        .route(
            "/staff/{staff_id}/time-logs/{log_id}/clock-out",
            post(attendance_http::handle_clock_out),
        )
        .route(
            "/staff/{staff_id}/time-logs/{log_id}/breaks",
            post(attendance_http::handle_start_break),
        )
        .route(
            "/staff/{staff_id}/time-logs/{log_id}/breaks/{break_id}/end",
            post(attendance_http::handle_end_break),
        )
        .with_state(state)
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod router_tests {
    use super::*;
    use crate::modules::timesheets::adapters::outbound::in_memory_timesheets::InMemoryTimesheets;
    use crate::modules::timesheets::core::ports::FixedClock;
    use crate::tests::fixtures::time_logs::{STAFF_ID, at};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let clock = Arc::new(FixedClock::new(at(9, 0, 0)));
        let backend = Arc::new(InMemoryTimesheets::new(clock).with_staff(STAFF_ID, vec![]));
        router(AppState::in_memory(backend))
    }

    #[tokio::test]
    async fn it_should_serve_rest_and_graphql_from_one_router() {
        let router = app();

        let response = router
            .clone()
            .oneshot(
                Request::post(format!("/staff/{STAFF_ID}/clock-in"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let query = format!(r#"{{"query":"{{ timeLogs(staffId: \"{STAFF_ID}\") {{ date }} }}"}}"#);
        let response = router
            .oneshot(
                Request::post("/gql")
                    .header("content-type", "application/json")
                    .body(Body::from(query))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["data"]["timeLogs"][0]["date"], "2025-03-14");
    }

    #[tokio::test]
    async fn it_should_serve_the_graphiql_page() {
        let response = app()
            .oneshot(Request::get("/gql").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&bytes).contains("graphiql"));
    }
}
