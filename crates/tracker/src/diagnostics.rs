//! Diagnostics seam for swallowed tracking failures.
//!
//! Tracking is at-most-once and must never surface an error to the page
//! layer, so failed appends are reported here instead. The default
//! implementation logs; tests inject a capturing implementation.

use pulse_core::EventKind;
use tracing::warn;

/// One swallowed append failure.
#[derive(Debug, Clone)]
pub struct TrackFailure {
    pub kind: EventKind,
    pub reason: String,
}

/// Receiver for swallowed failures.
pub trait Diagnostics: Send + Sync {
    fn report(&self, failure: TrackFailure);
}

/// Default diagnostics: a structured warn log per failure.
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, failure: TrackFailure) {
        warn!(
            kind = failure.kind.as_str(),
            reason = %failure.reason,
            "Event append failed"
        );
    }
}
