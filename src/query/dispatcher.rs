//! Pattern-based query dispatcher
//!
//! Routes a free-text query to a rollup. Classification is an ordered,
//! fixed-priority list of (predicate, intent) rules scanned against the
//! lowercased text; the first hit wins, not longest match and not most
//! specific. Unmatched text never fails: it resolves to a single-row
//! diagnostic result naming the source filter that would have applied.

use super::result::QueryResult;
use crate::rollup_core::{
    AggregationRule, CrossSourceAggregator, EventField, EventStore, RollupEngine, StoreError,
};
use serde_json::Value;
use std::sync::Arc;

/// Minimum USD value for a transfer to count toward volume (dust filter).
pub const TRANSFER_DUST_THRESHOLD_USD: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    TransferVolume,
    TxCount,
    GasFees,
}

/// One classification rule: a predicate over the lowercased query text
/// and the intent it resolves to.
pub struct QueryRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub intent: QueryIntent,
}

/// Default rule order. Priority is positional; reordering this list
/// changes how ambiguous text resolves.
pub fn default_rules() -> Vec<QueryRule> {
    vec![
        QueryRule {
            name: "transfer_volume",
            matches: |t| t.contains("transfer"),
            intent: QueryIntent::TransferVolume,
        },
        QueryRule {
            name: "tx_count",
            matches: |t| t.contains("transaction") || t.contains("tx"),
            intent: QueryIntent::TxCount,
        },
        QueryRule {
            name: "gas_fees",
            matches: |t| t.contains("gas") || t.contains("fee"),
            intent: QueryIntent::GasFees,
        },
    ]
}

pub struct QueryDispatcher {
    aggregator: CrossSourceAggregator,
    rules: Vec<QueryRule>,
    default_source: String,
}

impl QueryDispatcher {
    pub fn new(store: Arc<dyn EventStore>, default_source: impl Into<String>) -> Self {
        Self::with_rules(store, default_source, default_rules())
    }

    /// Build a dispatcher with an explicit rule order.
    pub fn with_rules(
        store: Arc<dyn EventStore>,
        default_source: impl Into<String>,
        rules: Vec<QueryRule>,
    ) -> Self {
        Self {
            aggregator: CrossSourceAggregator::new(RollupEngine::new(store)),
            rules,
            default_source: default_source.into(),
        }
    }

    /// Execute a free-text query.
    ///
    /// Errs only when the underlying event store is unavailable; every
    /// other input produces a result table.
    pub fn execute(&self, text: &str) -> Result<QueryResult, StoreError> {
        let lowered = text.to_lowercase();
        let source = extract_source_filter(&lowered)
            .unwrap_or_else(|| self.default_source.clone());

        for rule in &self.rules {
            if (rule.matches)(&lowered) {
                log::debug!("🔎 Query matched rule '{}' (source: {})", rule.name, source);
                return self.run_intent(rule.intent, &source);
            }
        }

        log::debug!("🔎 Query matched no rule, returning diagnostic (source: {})", source);
        Ok(diagnostic_result(&source))
    }

    fn run_intent(&self, intent: QueryIntent, source: &str) -> Result<QueryResult, StoreError> {
        let sources = vec![source.to_string()];
        let rows = match intent {
            QueryIntent::TransferVolume => self.aggregator.union_daily(
                &sources,
                "transfer_volume_usd",
                &AggregationRule::SumField {
                    field: EventField::AmountUsd,
                    min_value: Some(TRANSFER_DUST_THRESHOLD_USD),
                },
            )?,
            QueryIntent::TxCount => {
                self.aggregator
                    .union_daily(&sources, "tx_count", &AggregationRule::Count)?
            }
            QueryIntent::GasFees => self.aggregator.union_daily(
                &sources,
                "gas_fees_usd",
                &AggregationRule::SumField {
                    field: EventField::GasFeeUsd,
                    min_value: None,
                },
            )?,
        };

        Ok(QueryResult::from_daily_rows(&rows))
    }
}

/// Single-row diagnostic for text no rule recognized.
fn diagnostic_result(source: &str) -> QueryResult {
    let mut result = QueryResult::new(vec!["message", "blockchain"]);
    result.push_row(vec![
        Value::from("no metric pattern matched this query"),
        Value::from(source),
    ]);
    result
}

/// Extract the source filter from an equality clause on a source-like
/// field: `blockchain = 'starknet'`, `source = "base"`, `chain = zk`.
///
/// Expects lowercased text. Not a SQL parser; a plain clause scan is the
/// whole contract here.
pub fn extract_source_filter(lowered: &str) -> Option<String> {
    for key in ["blockchain", "source", "chain"] {
        let mut search_from = 0;
        while let Some(pos) = lowered[search_from..].find(key) {
            let after = &lowered[search_from + pos + key.len()..];
            let after = after.trim_start();
            if let Some(rest) = after.strip_prefix('=') {
                let rest = rest.trim_start();
                let value: String = rest
                    .trim_start_matches(['\'', '"'])
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
                    .collect();
                if !value.is_empty() {
                    return Some(value);
                }
            }
            search_from += pos + key.len();
        }
    }
    None
}
