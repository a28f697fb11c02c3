//! Daily rollup engine
//!
//! Turns the raw per-event records of one source into daily metric rows.
//! Grouping key is the event timestamp truncated to the UTC calendar day.
//! Days with zero qualifying events are omitted, not zero-filled; callers
//! that need a continuous series must fill gaps themselves.

use super::store::{EventStore, RawEvent, StoreError};
use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Numeric field of a raw event usable in a sum rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    AmountUsd,
    GasFeeUsd,
}

impl EventField {
    fn value_of(&self, event: &RawEvent) -> f64 {
        match self {
            EventField::AmountUsd => event.amount_usd,
            EventField::GasFeeUsd => event.gas_fee_usd,
        }
    }
}

/// Per-day aggregation rule.
///
/// `min_value` on a sum discards events below the threshold before
/// summing (used to exclude dust transfers from volume metrics).
#[derive(Debug, Clone, Copy)]
pub enum AggregationRule {
    Count,
    SumField {
        field: EventField,
        min_value: Option<f64>,
    },
}

/// One daily metric row for one (source, day) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMetricRow {
    pub source: String,
    pub date: NaiveDate,
    pub metric_type: String,
    pub value: f64,
    pub currency: Option<String>,
}

/// Rollup engine over an injected event store.
///
/// `compute_daily_metric` is pure with respect to the store snapshot:
/// identical event sets always produce identical rows.
pub struct RollupEngine {
    store: Arc<dyn EventStore>,
}

impl RollupEngine {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Compute one daily metric for a source.
    ///
    /// Returns one row per distinct UTC day present in the qualifying
    /// event set, ascending by date. Only store failures propagate.
    pub fn compute_daily_metric(
        &self,
        source: &str,
        metric_type: &str,
        rule: &AggregationRule,
    ) -> Result<Vec<DailyMetricRow>, StoreError> {
        let events = self.store.events_for_source(source)?;

        // BTreeMap keeps days in ascending order
        let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for event in &events {
            match rule {
                AggregationRule::Count => {
                    *buckets.entry(utc_day(event.timestamp)).or_insert(0.0) += 1.0;
                }
                AggregationRule::SumField { field, min_value } => {
                    let value = field.value_of(event);
                    if let Some(min) = min_value {
                        if value < *min {
                            continue;
                        }
                    }
                    *buckets.entry(utc_day(event.timestamp)).or_insert(0.0) += value;
                }
            }
        }

        let currency = match rule {
            AggregationRule::Count => None,
            AggregationRule::SumField { .. } => Some("usd".to_string()),
        };

        let rows = buckets
            .into_iter()
            .map(|(date, value)| DailyMetricRow {
                source: source.to_string(),
                date,
                metric_type: metric_type.to_string(),
                value,
                currency: currency.clone(),
            })
            .collect();

        Ok(rows)
    }
}

/// Truncate a Unix timestamp to its UTC calendar day.
fn utc_day(timestamp: i64) -> NaiveDate {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive())
        .unwrap_or(NaiveDate::MIN)
}
