//! Cross-source aggregation
//!
//! Unions per-source daily rollups across sources. Deliberately never
//! sums across sources: each row keeps its source tag, and any numeric
//! combination is left to the visualization layer's group-by.

use super::daily::{AggregationRule, DailyMetricRow, RollupEngine};
use super::store::StoreError;

pub struct CrossSourceAggregator {
    engine: RollupEngine,
}

impl CrossSourceAggregator {
    pub fn new(engine: RollupEngine) -> Self {
        Self { engine }
    }

    /// Concatenate each source's rollup output, in source-list order.
    ///
    /// Within each source the rows stay ascending by date (the engine's
    /// ordering). Sources with no qualifying events contribute nothing.
    pub fn union_daily(
        &self,
        sources: &[String],
        metric_type: &str,
        rule: &AggregationRule,
    ) -> Result<Vec<DailyMetricRow>, StoreError> {
        let mut rows = Vec::new();
        for source in sources {
            rows.extend(self.engine.compute_daily_metric(source, metric_type, rule)?);
        }
        Ok(rows)
    }
}
