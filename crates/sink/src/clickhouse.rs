//! ClickHouse-backed event sink.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use pulse_core::{DeviceClass, Error, EventKind, EventRecord, Result, TicketClickRecord};

use crate::config::SinkConfig;
use crate::EventSink;

/// Flattened event row for ClickHouse.
#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct EventRow {
    pub id: String,
    pub session_id: String,
    pub kind: String,
    pub subject_id: String,
    pub label: String,
    pub context: String,
    pub device_class: String,
    pub referrer: String,
    pub anon_id: Option<String>,
    pub metadata: String,
    /// Milliseconds since epoch (DateTime64(3) column).
    pub created_at: i64,
}

impl From<EventRecord> for EventRow {
    fn from(record: EventRecord) -> Self {
        Self {
            id: record.id.to_string(),
            session_id: record.session_id.to_string(),
            kind: record.kind.as_str().to_string(),
            subject_id: record.subject_id,
            label: record.label,
            context: record.context,
            device_class: record.device_class.as_str().to_string(),
            referrer: record.referrer,
            anon_id: record.anon_id,
            metadata: if record.metadata.is_null() {
                String::new()
            } else {
                record.metadata.to_string()
            },
            created_at: record.created_at.timestamp_millis(),
        }
    }
}

impl EventRow {
    /// Decodes a stored row back into a record.
    ///
    /// Rows with an unknown kind or mangled ids are dropped rather than
    /// failing the whole read.
    fn into_record(self) -> Option<EventRecord> {
        let kind = EventKind::parse(&self.kind)?;
        let id = Uuid::parse_str(&self.id).ok()?;
        let session_id = Uuid::parse_str(&self.session_id).ok()?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(self.created_at)?;

        let metadata = if self.metadata.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&self.metadata).unwrap_or(serde_json::Value::Null)
        };

        Some(EventRecord {
            id,
            session_id,
            kind,
            subject_id: self.subject_id,
            label: self.label,
            context: self.context,
            device_class: DeviceClass::parse(&self.device_class),
            referrer: self.referrer,
            anon_id: self.anon_id,
            metadata,
            created_at,
        })
    }
}

/// Flattened ticket-click row for ClickHouse.
#[derive(Debug, Clone, Row, Serialize, Deserialize)]
pub struct TicketClickRow {
    pub id: String,
    pub session_id: String,
    pub event_id: String,
    pub event_name: String,
    pub venue_id: String,
    pub venue_name: String,
    pub genre_slug: String,
    pub genre_name: String,
    pub promoter_id: String,
    pub promoter_name: String,
    pub start_time: Option<i64>,
    pub price: Option<f64>,
    pub ticket_url: String,
    pub click_source: String,
    pub device_class: String,
    pub created_at: i64,
}

impl From<TicketClickRecord> for TicketClickRow {
    fn from(record: TicketClickRecord) -> Self {
        Self {
            id: record.id.to_string(),
            session_id: record.session_id.to_string(),
            event_id: record.event_id,
            event_name: record.event_name,
            venue_id: record.venue_id,
            venue_name: record.venue_name,
            genre_slug: record.genre_slug,
            genre_name: record.genre_name,
            promoter_id: record.promoter_id,
            promoter_name: record.promoter_name,
            start_time: record.start_time.map(|t| t.timestamp_millis()),
            price: record.price,
            ticket_url: record.ticket_url,
            click_source: record.click_source,
            device_class: record.device_class.as_str().to_string(),
            created_at: record.created_at.timestamp_millis(),
        }
    }
}

/// ClickHouse-backed sink.
#[derive(Clone)]
pub struct ClickHouseSink {
    inner: Client,
    config: SinkConfig,
}

impl ClickHouseSink {
    /// Creates a new sink from configuration.
    pub fn new(config: SinkConfig) -> Result<Self> {
        let mut client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);

        if let Some(ref user) = config.username {
            client = client.with_user(user);
        }

        if let Some(ref pass) = config.password {
            client = client.with_password(pass);
        }

        info!(
            url = %config.url,
            database = %config.database,
            "Created ClickHouse sink"
        );

        Ok(Self {
            inner: client,
            config,
        })
    }

    /// Returns the inner clickhouse client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// Verifies the store answers a trivial query.
    pub async fn check_connection(&self) -> bool {
        match self.inner.query("SELECT 1").fetch_one::<u8>().await {
            Ok(_) => true,
            Err(e) => {
                warn!("ClickHouse connection check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl EventSink for ClickHouseSink {
    async fn append(&self, record: EventRecord) -> Result<()> {
        let row = EventRow::from(record);
        let mut insert = self
            .inner
            .insert::<EventRow>("events")
            .map_err(|e| Error::sink(format!("insert open failed: {}", e)))?;
        insert
            .write(&row)
            .await
            .map_err(|e| Error::sink(format!("insert write failed: {}", e)))?;
        insert
            .end()
            .await
            .map_err(|e| Error::sink(format!("insert commit failed: {}", e)))?;
        Ok(())
    }

    async fn append_ticket_click(&self, record: TicketClickRecord) -> Result<()> {
        let row = TicketClickRow::from(record);
        let mut insert = self
            .inner
            .insert::<TicketClickRow>("ticket_clicks")
            .map_err(|e| Error::sink(format!("insert open failed: {}", e)))?;
        insert
            .write(&row)
            .await
            .map_err(|e| Error::sink(format!("insert write failed: {}", e)))?;
        insert
            .end()
            .await
            .map_err(|e| Error::sink(format!("insert commit failed: {}", e)))?;
        Ok(())
    }

    async fn read_range(&self, since: DateTime<Utc>) -> Result<Vec<EventRecord>> {
        let rows: Vec<EventRow> = self
            .inner
            .query(
                "SELECT id, session_id, kind, subject_id, label, context, \
                 device_class, referrer, anon_id, metadata, created_at \
                 FROM events \
                 WHERE created_at >= fromUnixTimestamp64Milli(?) \
                 ORDER BY created_at DESC",
            )
            .bind(since.timestamp_millis())
            .fetch_all()
            .await
            .map_err(|e| Error::sink(format!("range read failed: {}", e)))?;

        let total = rows.len();
        let records: Vec<EventRecord> = rows.into_iter().filter_map(EventRow::into_record).collect();

        if records.len() < total {
            warn!(
                dropped = total - records.len(),
                "Dropped undecodable event rows from range read"
            );
        }

        Ok(records)
    }
}
