//! SQLite-backed raw event store
//!
//! Read-only backend over the ingestion side's `events` table. The
//! connection is opened with `query_only` so this core can never write
//! into the append-only event log, even by accident.

use super::store::{EventStore, RawEvent, StoreError};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

/// Read-only SQLite event store.
///
/// Expects the ingestion schema:
///
/// ```sql
/// CREATE TABLE events (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     source TEXT NOT NULL,
///     timestamp INTEGER NOT NULL,
///     event_type TEXT NOT NULL,
///     amount_usd REAL NOT NULL,
///     gas_fee_usd REAL NOT NULL
/// )
/// ```
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
}

impl SqliteEventStore {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;

        // Read-only mode: this core never writes into the event log
        conn.execute("PRAGMA query_only = ON", [])?;

        let event_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        log::info!("📥 SQLite event store opened: {} events", event_count);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl EventStore for SqliteEventStore {
    fn events_for_source(&self, source: &str) -> Result<Vec<RawEvent>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT source, timestamp, event_type, amount_usd, gas_fee_usd
             FROM events
             WHERE source = ?1
             ORDER BY id ASC",
        )?;

        let event_iter = stmt.query_map([source], |row| {
            Ok(RawEvent {
                source: row.get(0)?,
                timestamp: row.get(1)?,
                event_type: row.get(2)?,
                amount_usd: row.get(3)?,
                gas_fee_usd: row.get(4)?,
            })
        })?;

        let mut events = Vec::new();
        for result in event_iter {
            events.push(result?);
        }

        Ok(events)
    }
}
