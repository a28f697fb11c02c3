//! chainboard - ad hoc analytical queries over blockchain event data
//!
//! Raw per-event records are rolled up into daily per-source metrics,
//! served over persistent per-client query channels, transformed into
//! chart render models, and composed into shareable dashboards.
//!
//! ```text
//! events → RollupEngine → CrossSourceAggregator
//!     ↓ (on demand, via Gateway)
//! QueryDispatcher → QueryResult → viz::transform → RenderModel
//!     ↓
//! DashboardStore (widgets, fork, upsert)
//! ```

pub mod config;
pub mod dashboard;
pub mod gateway;
pub mod query;
pub mod rollup_core;
pub mod viz;

pub use config::Config;
pub use dashboard::DashboardStore;
pub use gateway::Gateway;
pub use query::{QueryDispatcher, QueryResult};
pub use rollup_core::{CrossSourceAggregator, RollupEngine};
