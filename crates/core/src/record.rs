//! Stored event records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::device::DeviceClass;
use crate::taxonomy::{EventKind, EventPayload, TicketClickData};

/// Browsing context supplied by the page layer with every tracking call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientContext {
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    /// Long-lived anonymous identifier, when the page layer has one.
    pub anon_id: Option<String>,
}

/// One immutable logged interaction.
///
/// Created once at emission time and never updated or deleted by the core;
/// retention is a store-level policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub kind: EventKind,
    /// The entity the event concerns (an event or venue id), or empty.
    pub subject_id: String,
    /// Primary display context: an event title, a filter value, a CTA name.
    pub label: String,
    /// Secondary display context, usually a venue name.
    pub context: String,
    pub device_class: DeviceClass,
    pub referrer: String,
    pub anon_id: Option<String>,
    /// Kind-specific extras, e.g. `{"view_source": "map_popup"}`.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl EventRecord {
    /// Builds a record from a payload and the per-call context.
    pub fn new(
        session_id: Uuid,
        device_class: DeviceClass,
        client: &ClientContext,
        payload: &EventPayload,
        created_at: DateTime<Utc>,
    ) -> Self {
        let fields = payload.record_fields();
        Self {
            id: Uuid::new_v4(),
            session_id,
            kind: payload.kind(),
            subject_id: fields.subject_id,
            label: fields.label,
            context: fields.context,
            device_class,
            referrer: client.referrer.clone().unwrap_or_default(),
            anon_id: client.anon_id.clone(),
            metadata: fields.metadata,
            created_at,
        }
    }
}

/// The specialized conversion row written alongside (not instead of) the
/// generic record for `ticket_click` events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketClickRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub event_id: String,
    pub event_name: String,
    pub venue_id: String,
    pub venue_name: String,
    pub genre_slug: String,
    pub genre_name: String,
    pub promoter_id: String,
    pub promoter_name: String,
    pub start_time: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub ticket_url: String,
    pub click_source: String,
    pub device_class: DeviceClass,
    pub created_at: DateTime<Utc>,
}

impl TicketClickRecord {
    pub fn from_data(
        session_id: Uuid,
        device_class: DeviceClass,
        data: &TicketClickData,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            event_id: data.event_id.clone(),
            event_name: data.event_name.clone(),
            venue_id: data.venue_id.clone(),
            venue_name: data.venue_name.clone(),
            genre_slug: data.genre_slug.clone(),
            genre_name: data.genre_name.clone(),
            promoter_id: data.promoter_id.clone(),
            promoter_name: data.promoter_name.clone(),
            start_time: data.start_time,
            price: data.price,
            ticket_url: data.ticket_url.clone(),
            click_source: data.click_source.clone(),
            device_class,
            created_at,
        }
    }
}
