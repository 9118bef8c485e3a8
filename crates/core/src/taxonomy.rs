//! The closed event taxonomy.
//!
//! Every interaction the app tracks is one of these kinds. Each kind carries
//! a typed payload, so the mapping from payload fields to the stored record
//! columns is exhaustive-checked rather than convention-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of interaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SessionStart,
    EventView,
    TicketClick,
    MapLoaded,
    MarkerClick,
    LocationEnabled,
    LocationDenied,
    MenuOpen,
    ListOpen,
    DateFilter,
    GenreFilter,
    DirectionsClick,
    ShareClick,
    CtaClick,
    ClaimStart,
    ClaimSubmit,
}

impl EventKind {
    /// Returns the wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionStart => "session_start",
            Self::EventView => "event_view",
            Self::TicketClick => "ticket_click",
            Self::MapLoaded => "map_loaded",
            Self::MarkerClick => "marker_click",
            Self::LocationEnabled => "location_enabled",
            Self::LocationDenied => "location_denied",
            Self::MenuOpen => "menu_open",
            Self::ListOpen => "list_open",
            Self::DateFilter => "date_filter",
            Self::GenreFilter => "genre_filter",
            Self::DirectionsClick => "directions_click",
            Self::ShareClick => "share_click",
            Self::CtaClick => "cta_click",
            Self::ClaimStart => "claim_start",
            Self::ClaimSubmit => "claim_submit",
        }
    }

    /// Parses a wire name back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s {
            "session_start" => Self::SessionStart,
            "event_view" => Self::EventView,
            "ticket_click" => Self::TicketClick,
            "map_loaded" => Self::MapLoaded,
            "marker_click" => Self::MarkerClick,
            "location_enabled" => Self::LocationEnabled,
            "location_denied" => Self::LocationDenied,
            "menu_open" => Self::MenuOpen,
            "list_open" => Self::ListOpen,
            "date_filter" => Self::DateFilter,
            "genre_filter" => Self::GenreFilter,
            "directions_click" => Self::DirectionsClick,
            "share_click" => Self::ShareClick,
            "cta_click" => Self::CtaClick,
            "claim_start" => Self::ClaimStart,
            "claim_submit" => Self::ClaimSubmit,
            _ => return None,
        };
        Some(kind)
    }
}

/// An event card or detail page was viewed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventViewData {
    pub event_id: String,
    pub title: String,
    pub venue_name: String,
    /// Where the view came from (map popup, list card, share link).
    pub view_source: Option<String>,
}

/// The revenue-relevant conversion: a ticket link was clicked.
///
/// Carries the full denormalized context because ticket clicks are also
/// written to their own table and queried independently of the generic log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketClickData {
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
}

/// A map pin was tapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerClickData {
    pub event_id: String,
    pub title: String,
    pub venue_name: String,
}

/// A date or genre filter value was applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterData {
    pub value: String,
}

/// Directions to a venue were requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsClickData {
    pub venue_id: String,
    pub venue_name: String,
}

/// An event was shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareClickData {
    pub event_id: String,
    pub title: String,
}

/// A named call-to-action was clicked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtaClickData {
    pub name: String,
}

/// A step in the venue-claim flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimData {
    pub venue_id: String,
}

/// Event payload variants, one per taxonomy kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    SessionStart,
    EventView(EventViewData),
    TicketClick(TicketClickData),
    MapLoaded,
    MarkerClick(MarkerClickData),
    LocationEnabled,
    LocationDenied,
    MenuOpen,
    ListOpen,
    DateFilter(FilterData),
    GenreFilter(FilterData),
    DirectionsClick(DirectionsClickData),
    ShareClick(ShareClickData),
    CtaClick(CtaClickData),
    ClaimStart(ClaimData),
    ClaimSubmit(ClaimData),
}

/// Record columns extracted from a payload.
#[derive(Debug, Clone, Default)]
pub struct RecordFields {
    pub subject_id: String,
    pub label: String,
    pub context: String,
    pub metadata: serde_json::Value,
}

impl EventPayload {
    /// Returns the taxonomy kind of this payload.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SessionStart => EventKind::SessionStart,
            Self::EventView(_) => EventKind::EventView,
            Self::TicketClick(_) => EventKind::TicketClick,
            Self::MapLoaded => EventKind::MapLoaded,
            Self::MarkerClick(_) => EventKind::MarkerClick,
            Self::LocationEnabled => EventKind::LocationEnabled,
            Self::LocationDenied => EventKind::LocationDenied,
            Self::MenuOpen => EventKind::MenuOpen,
            Self::ListOpen => EventKind::ListOpen,
            Self::DateFilter(_) => EventKind::DateFilter,
            Self::GenreFilter(_) => EventKind::GenreFilter,
            Self::DirectionsClick(_) => EventKind::DirectionsClick,
            Self::ShareClick(_) => EventKind::ShareClick,
            Self::CtaClick(_) => EventKind::CtaClick,
            Self::ClaimStart(_) => EventKind::ClaimStart,
            Self::ClaimSubmit(_) => EventKind::ClaimSubmit,
        }
    }

    /// Maps this payload onto the stored record columns.
    ///
    /// Exhaustive per variant: the subject is the entity the event concerns,
    /// the label is its display name (an event title, a filter value, a CTA
    /// name), the context is the secondary name (usually the venue).
    pub fn record_fields(&self) -> RecordFields {
        match self {
            Self::SessionStart
            | Self::MapLoaded
            | Self::LocationEnabled
            | Self::LocationDenied
            | Self::MenuOpen
            | Self::ListOpen => RecordFields::default(),

            Self::EventView(data) => RecordFields {
                subject_id: data.event_id.clone(),
                label: data.title.clone(),
                context: data.venue_name.clone(),
                metadata: match &data.view_source {
                    Some(source) => serde_json::json!({ "view_source": source }),
                    None => serde_json::Value::Null,
                },
            },

            Self::TicketClick(data) => RecordFields {
                subject_id: data.event_id.clone(),
                label: data.event_name.clone(),
                context: data.venue_name.clone(),
                metadata: serde_json::json!({
                    "click_source": data.click_source,
                    "ticket_url": data.ticket_url,
                }),
            },

            Self::MarkerClick(data) => RecordFields {
                subject_id: data.event_id.clone(),
                label: data.title.clone(),
                context: data.venue_name.clone(),
                metadata: serde_json::Value::Null,
            },

            Self::DateFilter(data) | Self::GenreFilter(data) => RecordFields {
                label: data.value.clone(),
                ..Default::default()
            },

            Self::DirectionsClick(data) => RecordFields {
                subject_id: data.venue_id.clone(),
                context: data.venue_name.clone(),
                ..Default::default()
            },

            Self::ShareClick(data) => RecordFields {
                subject_id: data.event_id.clone(),
                label: data.title.clone(),
                ..Default::default()
            },

            Self::CtaClick(data) => RecordFields {
                label: data.name.clone(),
                ..Default::default()
            },

            Self::ClaimStart(data) | Self::ClaimSubmit(data) => RecordFields {
                subject_id: data.venue_id.clone(),
                ..Default::default()
            },
        }
    }
}
