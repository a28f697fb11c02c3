//! Raw event store abstraction
//!
//! Raw events are immutable, append-only records owned by the ingestion
//! side. This core only reads them, so the seam is a read-only trait with
//! one backend per deployment shape (in-memory for tests, SQLite for the
//! runtime).

use std::collections::HashMap;
use std::sync::Mutex;

/// One raw per-event record as delivered by the ingestion collaborator.
///
/// `timestamp` is a Unix timestamp in seconds (UTC). Numeric fields carry
/// USD-denominated values; events that have no meaningful value for a
/// field carry 0.0.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub source: String,
    pub timestamp: i64,
    pub event_type: String,
    pub amount_usd: f64,
    pub gas_fee_usd: f64,
}

#[derive(Debug)]
pub enum StoreError {
    Database(rusqlite::Error),
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::Unavailable(msg) => write!(f, "Event store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read-only view over the raw event set of one source.
///
/// Implementations must return events in insertion order; the rollup
/// engine does its own day bucketing and does not rely on sort order.
pub trait EventStore: Send + Sync {
    fn events_for_source(&self, source: &str) -> Result<Vec<RawEvent>, StoreError>;
}

/// In-memory event store, keyed by source.
///
/// The injected instance for tests and for callers that already hold the
/// event set. Append-only: events cannot be removed or updated.
pub struct MemoryEventStore {
    events: Mutex<HashMap<String, Vec<RawEvent>>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(HashMap::new()),
        }
    }

    pub fn append(&self, event: RawEvent) {
        let mut events = self.events.lock().unwrap();
        events.entry(event.source.clone()).or_default().push(event);
    }

    pub fn append_all(&self, batch: Vec<RawEvent>) {
        for event in batch {
            self.append(event);
        }
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore for MemoryEventStore {
    fn events_for_source(&self, source: &str) -> Result<Vec<RawEvent>, StoreError> {
        let events = self.events.lock().unwrap();
        Ok(events.get(source).cloned().unwrap_or_default())
    }
}
