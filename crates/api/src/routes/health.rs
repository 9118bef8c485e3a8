//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use telemetry::health;

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - full health check.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let sink_connected = health().sink.is_healthy() && state.sink.is_healthy();

    Json(HealthResponse {
        status: if sink_connected {
            "healthy".to_string()
        } else {
            "unhealthy".to_string()
        },
        sink_connected,
    })
}

/// GET /health/ready - readiness probe (can accept traffic).
pub async fn ready_handler() -> StatusCode {
    if health().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health/live - liveness probe (service is running).
pub async fn live_handler() -> StatusCode {
    StatusCode::OK
}
