//! The append-only event store seam.
//!
//! The core only ever appends records and reads time-bounded slices back;
//! everything else about the store (retention, replication, deletion) is
//! somebody else's policy. Production uses ClickHouse; tests swap in an
//! in-memory sink behind the same trait.

pub mod clickhouse;
pub mod config;
pub mod schema;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pulse_core::{EventRecord, Result, TicketClickRecord};

pub use crate::clickhouse::ClickHouseSink;
pub use crate::config::SinkConfig;
pub use crate::schema::init_schema;

/// Durable append-only store of event records.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Appends one generic event record.
    async fn append(&self, record: EventRecord) -> Result<()>;

    /// Appends the specialized conversion row for a ticket click.
    async fn append_ticket_click(&self, record: TicketClickRecord) -> Result<()>;

    /// Reads all records with `created_at >= since`, newest first.
    /// Ties preserve insertion order.
    async fn read_range(&self, since: DateTime<Utc>) -> Result<Vec<EventRecord>>;

    /// Whether the sink is currently reachable.
    fn is_healthy(&self) -> bool {
        true
    }
}
