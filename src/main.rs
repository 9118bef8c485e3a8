//! Nightpulse analytics service
//!
//! Wires the analytics core together:
//! - fire-and-forget tracking endpoint backed by the ClickHouse event log
//! - query-time metric aggregation for the operator dashboard
//! - health probes for the sink

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use aggregator::Aggregator;
use api::{router, AppState};
use event_sink::{init_schema, ClickHouseSink, EventSink, SinkConfig};
use pulse_core::{MemoryPersistence, SessionStore, SystemClock};
use telemetry::{health, init_tracing_from_env};
use tracker::Tracker;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Minutes east of UTC the dashboard's calendar should use
    #[serde(default)]
    utc_offset_minutes: i32,

    #[serde(default)]
    sink: SinkConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            utc_offset_minutes: 0,
            sink: SinkConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Nightpulse analytics v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    // Initialize the ClickHouse sink
    let sink = Arc::new(
        ClickHouseSink::new(config.sink.clone()).context("Failed to create ClickHouse sink")?,
    );

    // Ensure tables exist
    if let Err(e) = init_schema(&sink).await {
        error!("Failed to initialize sink schema: {}", e);
        // Continue anyway - schema might already exist
    }

    // Check sink health and record it
    if sink.check_connection().await {
        health().sink.set_healthy();
        info!("Sink connection: healthy");
    } else {
        health().sink.set_unhealthy("Connection failed");
        error!("Sink connection: unhealthy");
    }

    // Assemble the pipeline
    let sessions = SessionStore::new(Arc::new(SystemClock), Arc::new(MemoryPersistence::new()));
    let tracker = Arc::new(Tracker::new(
        sink.clone() as Arc<dyn EventSink>,
        sessions,
    ));
    let aggregator = Arc::new(
        Aggregator::new(sink.clone() as Arc<dyn EventSink>)
            .with_utc_offset_minutes(config.utc_offset_minutes),
    );

    let state = AppState::new(sink.clone() as Arc<dyn EventSink>, tracker.clone(), aggregator);

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Let in-flight appends settle before exit
    info!("Shutting down...");
    tracker.flush().await;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("NIGHTPULSE")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for the nested sink config from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(url) = std::env::var("NIGHTPULSE_SINK_URL") {
        config.sink.url = url;
    }
    if let Ok(database) = std::env::var("NIGHTPULSE_SINK_DATABASE") {
        config.sink.database = database;
    }
    if let Ok(username) = std::env::var("NIGHTPULSE_SINK_USERNAME") {
        config.sink.username = Some(username);
    }
    if let Ok(password) = std::env::var("NIGHTPULSE_SINK_PASSWORD") {
        config.sink.password = Some(password);
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
