//! Tracking endpoint.
//!
//! Pages POST one tagged payload per interaction. The handler hands the
//! payload to the tracker and acknowledges immediately; the append runs in
//! the background and any failure stays inside the diagnostics seam.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use pulse_core::{ClientContext, EventPayload};

use crate::response::TrackResponse;
use crate::state::AppState;

/// Body of a tracking call: the tagged payload plus the page's anonymous id.
#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    #[serde(flatten)]
    pub payload: EventPayload,
    #[serde(default)]
    pub anon_id: Option<String>,
}

/// POST /track - fire-and-forget event ingestion.
pub async fn track_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TrackRequest>,
) -> Json<TrackResponse> {
    let client = ClientContext {
        user_agent: header_value(&headers, header::USER_AGENT),
        referrer: header_value(&headers, header::REFERER),
        anon_id: request.anon_id,
    };

    debug!(kind = request.payload.kind().as_str(), "Tracking event");

    state.tracker.track(request.payload, &client);

    Json(TrackResponse::accepted())
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
