//! Dashboard metrics endpoint.

use std::str::FromStr;

use aggregator::TimeRange;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::response::{ApiError, MetricsResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    #[serde(default)]
    pub range: Option<String>,
}

/// GET /metrics?range=today|7days|30days - dashboard snapshot.
///
/// A failed read degrades to the last accepted snapshot (zeroed when none
/// exists yet) with `degraded: true` rather than an error banner. Stale
/// completions (a slower request finishing after a newer one was issued)
/// never overwrite the snapshot the degraded path serves.
pub async fn metrics_handler(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let range = match query.range.as_deref() {
        Some(raw) => TimeRange::from_str(raw)
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => TimeRange::default(),
    };

    let token = state.gate.issue();

    match state.aggregator.compute_range(range).await {
        Ok(metrics) => {
            if state.gate.accept(token) {
                *state.latest_metrics.write() = Some(metrics.clone());
            }
            info!(
                range = range.as_str(),
                total_events = metrics.total_events,
                "Computed dashboard metrics"
            );
            Ok(Json(MetricsResponse::fresh(range.as_str(), metrics)))
        }
        Err(e) => {
            warn!(range = range.as_str(), error = %e, "Metrics read failed");
            let last_known = state.latest_metrics.read().clone();
            Ok(Json(MetricsResponse::degraded(range.as_str(), last_known)))
        }
    }
}
