//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use pulse_core::Metrics;

/// Acknowledgement for a tracking call.
///
/// Pages fire and forget; nothing in this body drives control flow.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrackResponse {
    pub accepted: bool,
    pub timestamp: i64,
}

impl TrackResponse {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// One dashboard metrics snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub range: String,
    /// True when the read failed and the last accepted snapshot (zeroed
    /// when none exists yet) is shown instead.
    pub degraded: bool,
    pub generated_at: i64,
    pub metrics: Metrics,
}

impl MetricsResponse {
    pub fn fresh(range: &str, metrics: Metrics) -> Self {
        Self {
            range: range.to_string(),
            degraded: false,
            generated_at: chrono::Utc::now().timestamp_millis(),
            metrics,
        }
    }

    pub fn degraded(range: &str, last_known: Option<Metrics>) -> Self {
        Self {
            range: range.to_string(),
            degraded: true,
            generated_at: chrono::Utc::now().timestamp_millis(),
            metrics: last_known.unwrap_or_else(Metrics::zeroed),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub sink_connected: bool,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API error type.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response: ErrorResponse { error: msg.into() },
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            response: ErrorResponse { error: msg.into() },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<pulse_core::Error> for ApiError {
    fn from(err: pulse_core::Error) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            response: ErrorResponse {
                error: err.to_string(),
            },
        }
    }
}
