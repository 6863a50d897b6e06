use crate::{handlers::AppState, models::HealthStatus};
use axum::{extract::State, Json};
use chrono::Utc;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let bus_ok = state.bus.ping().await;

    let status = if bus_ok { "healthy" } else { "degraded" };

    Json(HealthStatus {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        bus: bus_ok,
        uptime_seconds: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}
