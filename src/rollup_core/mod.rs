//! Rollup Core - Derived Metrics Engine
//!
//! Turns raw per-event blockchain records into daily per-source metric
//! rows and cross-source unions.
//!
//! # Architecture
//!
//! ```text
//! EventStore (memory or SQLite, read-only)
//!     ↓
//! RollupEngine (UTC-day bucketing, count / filtered-sum rules)
//!     ↓
//! CrossSourceAggregator (union across sources, no summation)
//!     ↓
//! QueryDispatcher → QueryResult
//! ```

pub mod daily;
pub mod multi_source;
pub mod sqlite_store;
pub mod store;

pub use daily::{AggregationRule, DailyMetricRow, EventField, RollupEngine};
pub use multi_source::CrossSourceAggregator;
pub use sqlite_store::SqliteEventStore;
pub use store::{EventStore, MemoryEventStore, RawEvent, StoreError};
