//! Test fixtures and payload builders.

use pulse_core::{ClientContext, TicketClickData};

/// iPhone Safari user agent.
pub const MOBILE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

/// Desktop Chrome user agent.
pub const DESKTOP_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Client context with a desktop UA and no referrer.
pub fn desktop_client() -> ClientContext {
    ClientContext {
        user_agent: Some(DESKTOP_UA.to_string()),
        referrer: None,
        anon_id: None,
    }
}

/// Client context with a specific referrer.
pub fn client_from(referrer: &str) -> ClientContext {
    ClientContext {
        user_agent: Some(DESKTOP_UA.to_string()),
        referrer: if referrer.is_empty() {
            None
        } else {
            Some(referrer.to_string())
        },
        anon_id: None,
    }
}

/// A complete ticket-click payload for the fixture event.
pub fn warehouse_ticket_click() -> TicketClickData {
    TicketClickData {
        event_id: "ev-100".into(),
        event_name: "Warehouse Rave".into(),
        venue_id: "v-10".into(),
        venue_name: "The Depot".into(),
        genre_slug: "techno".into(),
        genre_name: "Techno".into(),
        promoter_id: "p-1".into(),
        promoter_name: "Night Shift Collective".into(),
        start_time: None,
        price: Some(25.0),
        ticket_url: "https://tickets.example/ev-100".into(),
        click_source: "event_page".into(),
    }
}

/// JSON body for a tracked event view, as a page would POST it.
pub fn event_view_body(event_id: &str, title: &str, venue_name: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": "event_view",
        "event_id": event_id,
        "title": title,
        "venue_name": venue_name,
        "view_source": "list_card"
    })
}

/// JSON body for a tracked ticket click.
pub fn ticket_click_body(event_id: &str, event_name: &str, venue_name: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": "ticket_click",
        "event_id": event_id,
        "event_name": event_name,
        "venue_id": "v-10",
        "venue_name": venue_name,
        "genre_slug": "techno",
        "genre_name": "Techno",
        "promoter_id": "p-1",
        "promoter_name": "Night Shift Collective",
        "start_time": null,
        "price": 25.0,
        "ticket_url": "https://tickets.example/ev",
        "click_source": "event_page"
    })
}
