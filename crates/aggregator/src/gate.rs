//! Stale-response guard for dashboard refreshes.
//!
//! Aggregation reads are not cancellable, so a rapid series of time-range
//! changes can complete out of order. Each refresh takes a token; only the
//! response carrying the latest issued token may be accepted.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Monotonic request-generation gate.
#[derive(Debug, Default)]
pub struct RequestGate {
    latest: AtomicU64,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next token, invalidating every earlier one.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether a response carrying this token is still the latest.
    pub fn accept(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
