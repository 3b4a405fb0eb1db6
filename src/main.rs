use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use staff_timesheets::modules::timesheets::adapters::outbound::in_memory_timesheets::InMemoryTimesheets;
use staff_timesheets::modules::timesheets::core::ports::SystemClock;
use staff_timesheets::shell::config::AppConfig;
use staff_timesheets::shell::http::router;
use staff_timesheets::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env()?;

    // In-memory backend for now
    let backend = Arc::new(InMemoryTimesheets::new(Arc::new(SystemClock)));
    for staff_id in &config.seed_staff {
        backend.register_staff(staff_id).await;
    }

    let state = AppState::in_memory(backend).tracking(&config.seed_staff);
    let _refreshers: Vec<_> = state
        .sessions
        .values()
        .map(|coordinator| coordinator.spawn_background_refresh(config.refresh_period))
        .collect();

    let addr = config.addr();
    tracing::info!(tracked = config.seed_staff.len(), "GraphQL endpoint: http://{}/gql", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
