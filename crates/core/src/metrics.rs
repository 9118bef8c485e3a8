//! Dashboard metrics shapes.
//!
//! A `Metrics` value is derived on demand from a time-bounded slice of the
//! event log. It is never persisted; every dashboard refresh recomputes it.

use serde::{Deserialize, Serialize};

use crate::record::EventRecord;

/// How many entries the top-events/top-venues rankings keep.
pub const TOP_ENTRIES: usize = 10;

/// How many records the live feed shows.
pub const RECENT_FEED_SIZE: usize = 50;

/// Fixed cardinality of the hour-of-day histogram.
pub const HOURS_PER_DAY: usize = 24;

/// One entry in a view-count ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub views: u64,
}

/// One entry in a categorical breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub name: String,
    pub count: u64,
}

/// Referrer-derived traffic source classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficSource {
    Google,
    Instagram,
    Facebook,
    Other,
    Direct,
}

impl TrafficSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Other => "other",
            Self::Direct => "direct",
        }
    }

    /// Classification order matters: google, then instagram, then facebook,
    /// then any non-empty referrer, then direct.
    pub fn classify(referrer: &str) -> Self {
        if referrer.contains("google") {
            Self::Google
        } else if referrer.contains("instagram") {
            Self::Instagram
        } else if referrer.contains("facebook") {
            Self::Facebook
        } else if !referrer.is_empty() {
            Self::Other
        } else {
            Self::Direct
        }
    }

    /// All classes in classification order.
    pub fn all() -> [Self; 5] {
        [
            Self::Google,
            Self::Instagram,
            Self::Facebook,
            Self::Other,
            Self::Direct,
        ]
    }
}

/// The metric set one dashboard refresh renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    /// Distinct session ids in range.
    pub total_sessions: u64,
    /// Raw record count in range.
    pub total_events: u64,
    /// Distinct anonymous ids; records without one are excluded.
    pub unique_users: u64,
    /// Distinct sessions that started on the current local calendar day.
    pub today_sessions: u64,
    pub ticket_clicks: u64,
    pub event_views: u64,
    /// ticket_clicks / event_views as a percentage, 0 when there are no
    /// views. Unrounded; presentation rounds.
    pub conversion_rate: f64,
    pub top_events: Vec<RankedEntry>,
    pub top_venues: Vec<RankedEntry>,
    pub device_breakdown: Vec<BreakdownEntry>,
    /// Exactly 24 buckets, hours 0-23, zeros included.
    pub hourly_activity: Vec<u64>,
    pub source_breakdown: Vec<BreakdownEntry>,
    pub recent_events: Vec<EventRecord>,
}

impl Metrics {
    /// The defined empty-input snapshot: every count zero, every list empty,
    /// the histogram still 24 buckets wide.
    pub fn zeroed() -> Self {
        Self {
            total_sessions: 0,
            total_events: 0,
            unique_users: 0,
            today_sessions: 0,
            ticket_clicks: 0,
            event_views: 0,
            conversion_rate: 0.0,
            top_events: Vec::new(),
            top_venues: Vec::new(),
            device_breakdown: Vec::new(),
            hourly_activity: vec![0; HOURS_PER_DAY],
            source_breakdown: Vec::new(),
            recent_events: Vec::new(),
        }
    }
}
