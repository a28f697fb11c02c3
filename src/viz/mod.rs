//! Visualization layer - query results to render models

pub mod transform;

pub use transform::{coerce_number, transform, Aggregation, ChartKind, RenderModel, WidgetConfig};
