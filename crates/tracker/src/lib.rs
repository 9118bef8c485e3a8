//! Fire-and-forget event emitter.
//!
//! Every tracking call resolves the session id, classifies the device,
//! builds the record, and dispatches the append on a background task.
//! Nothing here blocks the caller and nothing returns an error: failed
//! appends go to the diagnostics seam and are otherwise dropped
//! (at-most-once, no retries).

pub mod diagnostics;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use event_sink::EventSink;
use pulse_core::{
    ClaimData, ClientContext, CtaClickData, DeviceClassifier, DirectionsClickData, EventPayload,
    EventRecord, EventViewData, FilterData, MarkerClickData, SessionStore, ShareClickData,
    TicketClickData, TicketClickRecord,
};

pub use diagnostics::{Diagnostics, LogDiagnostics, TrackFailure};

/// The tracking facade handed to the page layer.
pub struct Tracker {
    sink: Arc<dyn EventSink>,
    sessions: SessionStore,
    classifier: DeviceClassifier,
    diagnostics: Arc<dyn Diagnostics>,
    in_flight: Arc<AtomicUsize>,
}

impl Tracker {
    pub fn new(sink: Arc<dyn EventSink>, sessions: SessionStore) -> Self {
        Self {
            sink,
            sessions,
            classifier: DeviceClassifier::new(),
            diagnostics: Arc::new(LogDiagnostics),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replaces the diagnostics receiver (tests assert on captured failures).
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Tracks one interaction.
    ///
    /// The session window is scoped by the client's anonymous id, so
    /// distinct visitors hitting the same process never share a session.
    /// When this call mints a fresh session id, a `session_start` record is
    /// emitted first; a `ticket_click` additionally writes its specialized
    /// conversion row.
    pub fn track(&self, payload: EventPayload, client: &ClientContext) {
        let session = self
            .sessions
            .ensure(client.anon_id.as_deref().unwrap_or_default());
        let device = self.classifier.classify(client.user_agent.as_deref());
        let now = Utc::now();

        if session.fresh {
            self.dispatch(EventRecord::new(
                session.id,
                device,
                client,
                &EventPayload::SessionStart,
                now,
            ));
        }

        if let EventPayload::TicketClick(data) = &payload {
            self.dispatch_ticket_click(TicketClickRecord::from_data(
                session.id, device, data, now,
            ));
        }

        self.dispatch(EventRecord::new(session.id, device, client, &payload, now));
    }

    // Per-kind tracking functions, one per taxonomy kind.

    pub fn track_event_view(
        &self,
        event_id: impl Into<String>,
        title: impl Into<String>,
        venue_name: impl Into<String>,
        view_source: Option<String>,
        client: &ClientContext,
    ) {
        self.track(
            EventPayload::EventView(EventViewData {
                event_id: event_id.into(),
                title: title.into(),
                venue_name: venue_name.into(),
                view_source,
            }),
            client,
        );
    }

    pub fn track_ticket_click(&self, data: TicketClickData, client: &ClientContext) {
        self.track(EventPayload::TicketClick(data), client);
    }

    pub fn track_map_loaded(&self, client: &ClientContext) {
        self.track(EventPayload::MapLoaded, client);
    }

    pub fn track_marker_click(
        &self,
        event_id: impl Into<String>,
        title: impl Into<String>,
        venue_name: impl Into<String>,
        client: &ClientContext,
    ) {
        self.track(
            EventPayload::MarkerClick(MarkerClickData {
                event_id: event_id.into(),
                title: title.into(),
                venue_name: venue_name.into(),
            }),
            client,
        );
    }

    pub fn track_location_enabled(&self, client: &ClientContext) {
        self.track(EventPayload::LocationEnabled, client);
    }

    pub fn track_location_denied(&self, client: &ClientContext) {
        self.track(EventPayload::LocationDenied, client);
    }

    pub fn track_menu_open(&self, client: &ClientContext) {
        self.track(EventPayload::MenuOpen, client);
    }

    pub fn track_list_open(&self, client: &ClientContext) {
        self.track(EventPayload::ListOpen, client);
    }

    pub fn track_date_filter(&self, value: impl Into<String>, client: &ClientContext) {
        self.track(
            EventPayload::DateFilter(FilterData {
                value: value.into(),
            }),
            client,
        );
    }

    pub fn track_genre_filter(&self, value: impl Into<String>, client: &ClientContext) {
        self.track(
            EventPayload::GenreFilter(FilterData {
                value: value.into(),
            }),
            client,
        );
    }

    pub fn track_directions_click(
        &self,
        venue_id: impl Into<String>,
        venue_name: impl Into<String>,
        client: &ClientContext,
    ) {
        self.track(
            EventPayload::DirectionsClick(DirectionsClickData {
                venue_id: venue_id.into(),
                venue_name: venue_name.into(),
            }),
            client,
        );
    }

    pub fn track_share_click(
        &self,
        event_id: impl Into<String>,
        title: impl Into<String>,
        client: &ClientContext,
    ) {
        self.track(
            EventPayload::ShareClick(ShareClickData {
                event_id: event_id.into(),
                title: title.into(),
            }),
            client,
        );
    }

    pub fn track_cta_click(&self, name: impl Into<String>, client: &ClientContext) {
        self.track(
            EventPayload::CtaClick(CtaClickData { name: name.into() }),
            client,
        );
    }

    pub fn track_claim_start(&self, venue_id: impl Into<String>, client: &ClientContext) {
        self.track(
            EventPayload::ClaimStart(ClaimData {
                venue_id: venue_id.into(),
            }),
            client,
        );
    }

    pub fn track_claim_submit(&self, venue_id: impl Into<String>, client: &ClientContext) {
        self.track(
            EventPayload::ClaimSubmit(ClaimData {
                venue_id: venue_id.into(),
            }),
            client,
        );
    }

    /// Waits until every dispatched append has settled.
    ///
    /// Used on graceful shutdown and in tests; page-layer callers never
    /// await anything.
    pub async fn flush(&self) {
        while self.in_flight.load(Ordering::Acquire) > 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    fn dispatch(&self, record: EventRecord) {
        let sink = self.sink.clone();
        let diagnostics = self.diagnostics.clone();
        let in_flight = self.in_flight.clone();
        let kind = record.kind;

        in_flight.fetch_add(1, Ordering::AcqRel);
        tokio::spawn(async move {
            if let Err(e) = sink.append(record).await {
                diagnostics.report(TrackFailure {
                    kind,
                    reason: e.to_string(),
                });
            }
            in_flight.fetch_sub(1, Ordering::AcqRel);
        });
    }

    fn dispatch_ticket_click(&self, record: TicketClickRecord) {
        let sink = self.sink.clone();
        let diagnostics = self.diagnostics.clone();
        let in_flight = self.in_flight.clone();

        in_flight.fetch_add(1, Ordering::AcqRel);
        tokio::spawn(async move {
            if let Err(e) = sink.append_ticket_click(record).await {
                diagnostics.report(TrackFailure {
                    kind: pulse_core::EventKind::TicketClick,
                    reason: e.to_string(),
                });
            }
            in_flight.fetch_sub(1, Ordering::AcqRel);
        });
    }
}
