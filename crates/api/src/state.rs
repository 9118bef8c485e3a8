//! Application state shared across handlers.

use std::sync::Arc;

use aggregator::{Aggregator, RequestGate};
use event_sink::EventSink;
use parking_lot::RwLock;
use pulse_core::Metrics;
use tracker::Tracker;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Event sink (ClickHouse in production, mock in tests)
    pub sink: Arc<dyn EventSink>,
    /// Fire-and-forget emitter the track endpoint delegates to
    pub tracker: Arc<Tracker>,
    /// Dashboard metric reducer
    pub aggregator: Arc<Aggregator>,
    /// Stale-response guard across dashboard refreshes
    pub gate: Arc<RequestGate>,
    /// Latest accepted snapshot, served by the degraded path when a read
    /// fails; stale completions never overwrite it
    pub latest_metrics: Arc<RwLock<Option<Metrics>>>,
}

impl AppState {
    pub fn new(sink: Arc<dyn EventSink>, tracker: Arc<Tracker>, aggregator: Arc<Aggregator>) -> Self {
        Self {
            sink,
            tracker,
            aggregator,
            gate: Arc::new(RequestGate::new()),
            latest_metrics: Arc::new(RwLock::new(None)),
        }
    }
}
