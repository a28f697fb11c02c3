//! Query layer - free-text dispatch to rollups
//!
//! ```text
//! query text → QueryDispatcher (ordered rule list, first match wins)
//!     ↓
//! RollupEngine / diagnostic fallback
//!     ↓
//! QueryResult (columns + row tuples)
//! ```

pub mod dispatcher;
pub mod result;

pub use dispatcher::{default_rules, extract_source_filter, QueryDispatcher, QueryIntent, QueryRule};
pub use result::QueryResult;
