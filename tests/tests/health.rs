//! Health endpoint tests.

use integration_tests::setup::TestApp;

#[tokio::test]
async fn liveness_is_unconditional() {
    let app = TestApp::new();

    let response = app.server.get("/health/live").await;
    assert_eq!(response.status_code(), 200);
}

/// The readiness and health checks read the process-wide registry, so every
/// assertion that flips it lives in this one test.
#[tokio::test]
async fn health_follows_registry_and_sink() {
    let app = TestApp::new();

    // Nothing has marked the sink reachable yet.
    let response = app.server.get("/health/ready").await;
    assert_eq!(response.status_code(), 503);

    telemetry::health().sink.set_healthy();

    let response = app.server.get("/health/ready").await;
    assert_eq!(response.status_code(), 200);

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["sink_connected"], true);

    // A failing sink flips the full check even while the registry is green.
    app.sink.set_should_fail(true);
    let response = app.server.get("/health").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["sink_connected"], false);
}
