//! HTTP surface tests for /track and /metrics.

use integration_tests::fixtures;
use integration_tests::setup::TestApp;

#[tokio::test]
async fn track_acknowledges_immediately() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/track")
        .json(&fixtures::event_view_body("ev-100", "Warehouse Rave", "The Depot"))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], true);

    app.settle().await;
    // session_start + the view itself
    assert_eq!(app.sink.event_count(), 2);
}

#[tokio::test]
async fn tracked_events_show_up_in_metrics() {
    let app = TestApp::new();

    app.server
        .post("/track")
        .json(&fixtures::event_view_body("ev-100", "Warehouse Rave", "The Depot"))
        .await;
    app.server
        .post("/track")
        .json(&fixtures::ticket_click_body("ev-100", "Warehouse Rave", "The Depot"))
        .await;
    app.settle().await;

    let response = app
        .server
        .get("/metrics")
        .add_query_param("range", "today")
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["range"], "today");
    assert_eq!(body["degraded"], false);
    assert_eq!(body["metrics"]["event_views"], 1);
    assert_eq!(body["metrics"]["ticket_clicks"], 1);
    assert_eq!(body["metrics"]["conversion_rate"], 100.0);
    // both calls ride the same anonymous session
    assert_eq!(body["metrics"]["total_sessions"], 1);
    assert_eq!(body["metrics"]["top_events"][0]["name"], "Warehouse Rave");

    // the specialized conversion row was written alongside the generic record
    assert_eq!(app.sink.captured_ticket_clicks().len(), 1);
}

#[tokio::test]
async fn visitors_never_share_a_session() {
    let app = TestApp::new();

    app.server
        .post("/track")
        .add_header("User-Agent", fixtures::MOBILE_UA)
        .json(&serde_json::json!({ "kind": "map_loaded", "anon_id": "visitor-a" }))
        .await;
    app.server
        .post("/track")
        .add_header("User-Agent", fixtures::DESKTOP_UA)
        .json(&serde_json::json!({ "kind": "list_open", "anon_id": "visitor-b" }))
        .await;
    app.settle().await;

    let response = app
        .server
        .get("/metrics")
        .add_query_param("range", "today")
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["metrics"]["total_sessions"], 2);
    assert_eq!(body["metrics"]["today_sessions"], 2);
    assert_eq!(body["metrics"]["unique_users"], 2);

    // One session_start per visitor, each with its own device class.
    let devices = body["metrics"]["device_breakdown"].as_array().unwrap();
    assert_eq!(devices.len(), 2);
    for name in ["mobile", "desktop"] {
        let entry = devices
            .iter()
            .find(|e| e["name"] == name)
            .unwrap_or_else(|| panic!("missing device {name}"));
        assert_eq!(entry["count"], 1);
    }

    let events = app.sink.captured_events();
    let session_of = |anon: &str| {
        events
            .iter()
            .find(|r| r.anon_id.as_deref() == Some(anon))
            .map(|r| r.session_id)
            .unwrap()
    };
    assert_ne!(session_of("visitor-a"), session_of("visitor-b"));
}

#[tokio::test]
async fn range_defaults_to_today() {
    let app = TestApp::new();

    let response = app.server.get("/metrics").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["range"], "today");
}

#[tokio::test]
async fn unknown_range_is_rejected() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/metrics")
        .add_query_param("range", "90days")
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("90days"));
}

#[tokio::test]
async fn failed_read_degrades_to_zeroed_snapshot() {
    let app = TestApp::new();
    app.sink.set_should_fail(true);

    let response = app
        .server
        .get("/metrics")
        .add_query_param("range", "7days")
        .await;

    // Degradation is a 200 with a flag, not an error banner.
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["degraded"], true);
    assert_eq!(body["range"], "7days");
    assert_eq!(body["metrics"]["total_events"], 0);
    assert_eq!(body["metrics"]["hourly_activity"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn failed_read_serves_last_accepted_snapshot() {
    let app = TestApp::new();

    app.server
        .post("/track")
        .json(&fixtures::event_view_body("ev-100", "Warehouse Rave", "The Depot"))
        .await;
    app.settle().await;

    // A successful refresh publishes its snapshot.
    let response = app
        .server
        .get("/metrics")
        .add_query_param("range", "today")
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["degraded"], false);
    assert_eq!(body["metrics"]["event_views"], 1);

    // With the store down, the degraded path serves that snapshot.
    app.sink.set_should_fail(true);
    let response = app
        .server
        .get("/metrics")
        .add_query_param("range", "today")
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["degraded"], true);
    assert_eq!(body["metrics"]["event_views"], 1);
    assert_eq!(body["metrics"]["top_events"][0]["name"], "Warehouse Rave");
}

#[tokio::test]
async fn mobile_user_agent_reaches_device_breakdown() {
    let app = TestApp::new();

    app.server
        .post("/track")
        .add_header("User-Agent", fixtures::MOBILE_UA)
        .json(&serde_json::json!({ "kind": "map_loaded" }))
        .await;
    app.settle().await;

    let response = app
        .server
        .get("/metrics")
        .add_query_param("range", "today")
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["metrics"]["device_breakdown"][0]["name"], "mobile");
}

#[tokio::test]
async fn referrer_header_feeds_source_breakdown() {
    let app = TestApp::new();

    app.server
        .post("/track")
        .add_header("Referer", "https://www.google.com/search?q=techno+tonight")
        .json(&serde_json::json!({ "kind": "list_open" }))
        .await;
    app.settle().await;

    let response = app
        .server
        .get("/metrics")
        .add_query_param("range", "today")
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["metrics"]["source_breakdown"][0]["name"], "google");
}

#[tokio::test]
async fn anon_id_in_body_counts_toward_uniques() {
    let app = TestApp::new();

    app.server
        .post("/track")
        .json(&serde_json::json!({ "kind": "menu_open", "anon_id": "anon-42" }))
        .await;
    app.settle().await;

    let response = app
        .server
        .get("/metrics")
        .add_query_param("range", "today")
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["metrics"]["unique_users"], 1);
}

#[tokio::test]
async fn malformed_payload_is_rejected_without_tracking() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/track")
        .json(&serde_json::json!({ "kind": "not_a_real_kind" }))
        .await;

    assert_ne!(response.status_code(), 200);
    app.settle().await;
    assert_eq!(app.sink.event_count(), 0);
}
