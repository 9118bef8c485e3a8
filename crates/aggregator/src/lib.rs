//! Query-time aggregation of the event log into dashboard metrics.
//!
//! A pure read-reduce-return pipeline: pull the time-bounded slice from the
//! sink, fold it once, hand back a `Metrics` snapshot. No state is held
//! between calls and nothing is cached; every dashboard refresh recomputes.

pub mod gate;
pub mod range;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Timelike, Utc};

use event_sink::EventSink;
use pulse_core::{
    BreakdownEntry, EventKind, EventRecord, Metrics, RankedEntry, Result, TrafficSource,
    HOURS_PER_DAY, RECENT_FEED_SIZE, TOP_ENTRIES,
};

pub use gate::{RequestGate, RequestToken};
pub use range::TimeRange;

/// Counter preserving first-seen order so equal counts rank stably.
#[derive(Default)]
struct StableCounter {
    counts: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl StableCounter {
    fn bump(&mut self, name: &str) {
        match self.index.get(name) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(name.to_string(), self.counts.len());
                self.counts.push((name.to_string(), 1));
            }
        }
    }

    fn into_ranked(self, limit: usize) -> Vec<RankedEntry> {
        let mut counts = self.counts;
        // Stable sort: ties keep first-seen order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(limit)
            .map(|(name, views)| RankedEntry { name, views })
            .collect()
    }

    fn into_breakdown(self) -> Vec<BreakdownEntry> {
        let mut counts = self.counts;
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .map(|(name, count)| BreakdownEntry { name, count })
            .collect()
    }
}

/// Reduces a time-bounded event slice into the dashboard metric set.
pub struct Aggregator {
    sink: Arc<dyn EventSink>,
    /// Offset applied before taking calendar days and hour buckets; the
    /// dashboard thinks in venue-local time, the log stores UTC.
    local_offset: FixedOffset,
}

impl Aggregator {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            local_offset: FixedOffset::east_opt(0).expect("zero offset is valid"),
        }
    }

    /// Sets the local-time offset in minutes east of UTC.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        if let Some(offset) = FixedOffset::east_opt(minutes * 60) {
            self.local_offset = offset;
        }
        self
    }

    /// Computes metrics for a named dashboard range.
    pub async fn compute_range(&self, range: TimeRange) -> Result<Metrics> {
        self.compute(range.since(Utc::now())).await
    }

    /// Computes metrics over all records with `created_at >= since`.
    ///
    /// An empty slice is not an error: it reduces to the zeroed snapshot.
    /// A sink read failure is returned to the caller so it can render a
    /// genuine error state instead of silently showing zeros.
    pub async fn compute(&self, since: DateTime<Utc>) -> Result<Metrics> {
        let records = self.sink.read_range(since).await?;
        Ok(self.reduce(records, Utc::now()))
    }

    /// Single-pass fold over an immutable, newest-first slice.
    fn reduce(&self, records: Vec<EventRecord>, now: DateTime<Utc>) -> Metrics {
        if records.is_empty() {
            return Metrics::zeroed();
        }

        let today = now.with_timezone(&self.local_offset).date_naive();

        let mut sessions: HashSet<uuid::Uuid> = HashSet::new();
        let mut users: HashSet<&str> = HashSet::new();
        let mut today_sessions: HashSet<uuid::Uuid> = HashSet::new();
        let mut ticket_clicks: u64 = 0;
        let mut event_views: u64 = 0;
        let mut top_events = StableCounter::default();
        let mut top_venues = StableCounter::default();
        let mut devices = StableCounter::default();
        let mut hours = [0u64; HOURS_PER_DAY];
        let mut source_counts = [0u64; 5];

        for record in &records {
            sessions.insert(record.session_id);

            // Records without an anonymous id are excluded from the unique
            // count, not lumped together as one user.
            if let Some(anon_id) = record.anon_id.as_deref() {
                users.insert(anon_id);
            }

            match record.kind {
                EventKind::TicketClick => ticket_clicks += 1,
                EventKind::EventView => {
                    event_views += 1;
                    top_events.bump(non_empty(&record.label));
                    top_venues.bump(non_empty(&record.context));
                }
                EventKind::SessionStart => {
                    devices.bump(record.device_class.as_str());
                    let local_day = record
                        .created_at
                        .with_timezone(&self.local_offset)
                        .date_naive();
                    if local_day == today {
                        today_sessions.insert(record.session_id);
                    }
                }
                _ => {}
            }

            let hour = record.created_at.with_timezone(&self.local_offset).hour();
            hours[hour as usize] += 1;

            let source = TrafficSource::classify(&record.referrer);
            let slot = TrafficSource::all()
                .iter()
                .position(|s| *s == source)
                .unwrap_or(0);
            source_counts[slot] += 1;
        }

        let mut source_breakdown: Vec<BreakdownEntry> = TrafficSource::all()
            .iter()
            .zip(source_counts)
            .filter(|(_, count)| *count > 0)
            .map(|(source, count)| BreakdownEntry {
                name: source.as_str().to_string(),
                count,
            })
            .collect();
        source_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

        let conversion_rate = if event_views > 0 {
            (ticket_clicks as f64 / event_views as f64) * 100.0
        } else {
            0.0
        };

        let recent_events: Vec<EventRecord> =
            records.iter().take(RECENT_FEED_SIZE).cloned().collect();

        Metrics {
            total_sessions: sessions.len() as u64,
            total_events: records.len() as u64,
            unique_users: users.len() as u64,
            today_sessions: today_sessions.len() as u64,
            ticket_clicks,
            event_views,
            conversion_rate,
            top_events: top_events.into_ranked(TOP_ENTRIES),
            top_venues: top_venues.into_ranked(TOP_ENTRIES),
            device_breakdown: devices.into_breakdown(),
            hourly_activity: hours.to_vec(),
            source_breakdown,
            recent_events,
        }
    }
}

fn non_empty(value: &str) -> &str {
    if value.is_empty() {
        "Unknown"
    } else {
        value
    }
}
