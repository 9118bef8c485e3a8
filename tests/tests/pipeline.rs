//! End-to-end pipeline tests: tracker -> sink -> aggregator.
//!
//! These exercise the real tracker and aggregator over the in-memory sink,
//! checking that what goes in one end comes out the other as dashboard
//! numbers.

use std::sync::Arc;

use chrono::{Duration, Utc};
use event_sink::EventSink;
use pulse_core::{MemoryPersistence, SessionStore, SystemClock};
use tracker::Tracker;

use integration_tests::fixtures;
use integration_tests::mocks::MockSink;

fn tracker_over(sink: Arc<MockSink>) -> Tracker {
    let sessions = SessionStore::new(Arc::new(SystemClock), Arc::new(MemoryPersistence::new()));
    Tracker::new(sink as Arc<dyn EventSink>, sessions)
}

fn aggregator_over(sink: Arc<MockSink>) -> aggregator::Aggregator {
    aggregator::Aggregator::new(sink as Arc<dyn EventSink>)
}

#[tokio::test]
async fn view_and_click_convert_at_one_hundred_percent() {
    let sink = Arc::new(MockSink::new());
    let tracker = tracker_over(sink.clone());
    let client = fixtures::desktop_client();

    tracker.track_event_view("ev-100", "Warehouse Rave", "The Depot", None, &client);
    tracker.track_ticket_click(fixtures::warehouse_ticket_click(), &client);
    tracker.flush().await;

    let metrics = aggregator_over(sink)
        .compute(Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(metrics.event_views, 1);
    assert_eq!(metrics.ticket_clicks, 1);
    assert_eq!(metrics.conversion_rate, 100.0);
    // view + click + the session_start the tracker emits on first contact
    assert_eq!(metrics.total_events, 3);
    assert_eq!(metrics.total_sessions, 1);
}

#[tokio::test]
async fn repeat_views_rank_events_and_venues() {
    let sink = Arc::new(MockSink::new());
    let tracker = tracker_over(sink.clone());
    let client = fixtures::desktop_client();

    tracker.track_event_view("ev-100", "Warehouse Rave", "The Depot", None, &client);
    tracker.track_event_view("ev-100", "Warehouse Rave", "The Depot", None, &client);
    tracker.track_event_view("ev-200", "Disco Night", "Basement Bar", None, &client);
    tracker.flush().await;

    let metrics = aggregator_over(sink)
        .compute(Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(metrics.top_events.len(), 2);
    assert_eq!(metrics.top_events[0].name, "Warehouse Rave");
    assert_eq!(metrics.top_events[0].views, 2);
    assert_eq!(metrics.top_events[1].name, "Disco Night");
    assert_eq!(metrics.top_events[1].views, 1);
    assert_eq!(metrics.top_venues[0].name, "The Depot");
}

#[tokio::test]
async fn referrers_break_down_by_traffic_source() {
    let sink = Arc::new(MockSink::new());

    let tracker = tracker_over(sink.clone());

    // Three visitors, three sessions, three referrers. Each session produces
    // a session_start plus a view carrying the same referrer.
    let visitors = [
        ("visitor-a", "https://www.google.com/search?q="),
        ("visitor-b", ""),
        ("visitor-c", "https://l.instagram.com/"),
    ];
    for (anon_id, referrer) in visitors {
        let mut client = fixtures::client_from(referrer);
        client.anon_id = Some(anon_id.to_string());
        tracker.track_event_view("ev-100", "Warehouse Rave", "The Depot", None, &client);
    }
    tracker.flush().await;

    let metrics = aggregator_over(sink)
        .compute(Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(metrics.source_breakdown.len(), 3);
    for name in ["google", "direct", "instagram"] {
        let entry = metrics
            .source_breakdown
            .iter()
            .find(|e| e.name == name)
            .unwrap_or_else(|| panic!("missing source {name}"));
        assert_eq!(entry.count, 2);
    }
    assert_eq!(metrics.total_sessions, 3);
}

#[tokio::test]
async fn quiet_range_reduces_to_zeros() {
    let sink = Arc::new(MockSink::new());
    let tracker = tracker_over(sink.clone());

    tracker.track_map_loaded(&fixtures::desktop_client());
    tracker.flush().await;

    // Everything recorded sits outside the queried window.
    let metrics = aggregator_over(sink)
        .compute(Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(metrics.total_events, 0);
    assert_eq!(metrics.total_sessions, 0);
    assert_eq!(metrics.conversion_rate, 0.0);
    assert!(metrics.recent_events.is_empty());
    assert!(metrics.source_breakdown.is_empty());
}

#[tokio::test]
async fn every_view_tracked_is_a_view_counted() {
    let sink = Arc::new(MockSink::new());
    let tracker = tracker_over(sink.clone());
    let client = fixtures::desktop_client();

    for i in 0..25 {
        tracker.track_event_view(
            format!("ev-{i}"),
            format!("Event {i}"),
            "The Depot",
            None,
            &client,
        );
    }
    tracker.flush().await;

    let metrics = aggregator_over(sink)
        .compute(Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(metrics.event_views, 25);
    // 25 views + 1 session_start
    assert_eq!(metrics.total_events, 26);
    assert_eq!(metrics.hourly_activity.iter().sum::<u64>(), 26);
}

#[tokio::test]
async fn session_start_lands_in_device_and_today_counts() {
    let sink = Arc::new(MockSink::new());
    let tracker = tracker_over(sink.clone());

    let mobile = pulse_core::ClientContext {
        user_agent: Some(fixtures::MOBILE_UA.to_string()),
        referrer: None,
        anon_id: Some("anon-1".to_string()),
    };
    tracker.track_list_open(&mobile);
    tracker.track_genre_filter("techno", &mobile);
    tracker.flush().await;

    let metrics = aggregator_over(sink)
        .compute(Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(metrics.today_sessions, 1);
    assert_eq!(metrics.unique_users, 1);
    assert_eq!(metrics.device_breakdown.len(), 1);
    assert_eq!(metrics.device_breakdown[0].name, "mobile");
    assert_eq!(metrics.device_breakdown[0].count, 1);
}

#[tokio::test]
async fn recent_feed_is_newest_first_and_capped() {
    let sink = Arc::new(MockSink::new());
    let tracker = tracker_over(sink.clone());
    let client = fixtures::desktop_client();

    for i in 0..60 {
        tracker.track_cta_click(format!("cta-{i}"), &client);
        tracker.flush().await;
    }

    let metrics = aggregator_over(sink)
        .compute(Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(metrics.recent_events.len(), 50);
    for pair in metrics.recent_events.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}
