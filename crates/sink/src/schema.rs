//! ClickHouse table schemas for the event log.

use tracing::info;

use pulse_core::{Error, Result};

use crate::clickhouse::ClickHouseSink;

/// SQL for creating the generic event log.
pub const CREATE_EVENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    id String,
    session_id String,
    kind LowCardinality(String),
    subject_id String,
    label String,
    context String,
    device_class LowCardinality(String),
    referrer String,
    anon_id Nullable(String),
    metadata String,
    created_at DateTime64(3)
)
ENGINE = MergeTree()
PARTITION BY toYYYYMM(created_at)
ORDER BY (created_at, id)
SETTINGS index_granularity = 8192
"#;

/// SQL for creating the ticket-click conversion table.
///
/// Denormalized on purpose: this one table answers revenue questions
/// without joining back to events or the catalog.
pub const CREATE_TICKET_CLICKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ticket_clicks (
    id String,
    session_id String,
    event_id String,
    event_name String,
    venue_id String,
    venue_name String,
    genre_slug LowCardinality(String),
    genre_name LowCardinality(String),
    promoter_id String,
    promoter_name String,
    start_time Nullable(DateTime64(3)),
    price Nullable(Float64),
    ticket_url String,
    click_source LowCardinality(String),
    device_class LowCardinality(String),
    created_at DateTime64(3)
)
ENGINE = MergeTree()
PARTITION BY toYYYYMM(created_at)
ORDER BY (created_at, id)
SETTINGS index_granularity = 8192
"#;

/// Creates the tables if they do not exist.
pub async fn init_schema(sink: &ClickHouseSink) -> Result<()> {
    for (name, ddl) in [
        ("events", CREATE_EVENTS_TABLE),
        ("ticket_clicks", CREATE_TICKET_CLICKS_TABLE),
    ] {
        sink.inner()
            .query(ddl)
            .execute()
            .await
            .map_err(|e| Error::sink(format!("creating {} table failed: {}", name, e)))?;
        info!(table = name, "Schema ensured");
    }
    Ok(())
}
