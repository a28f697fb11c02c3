//! Tabular query result
//!
//! The shape every dispatched query resolves to: ordered column names
//! plus ordered row tuples. Cells are JSON values because result tables
//! mix strings (sources, dates, metric names) with numbers.

use crate::rollup_core::DailyMetricRow;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(columns: Vec<&str>) -> Self {
        Self {
            columns: columns.into_iter().map(String::from).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Every row must have one cell per column.
    ///
    /// Panics if the row width does not match the column count; a
    /// ragged table would otherwise surface much later, inside a chart.
    pub fn push_row(&mut self, row: Vec<Value>) {
        assert_eq!(row.len(), self.columns.len(), "row width != column count");
        self.rows.push(row);
    }

    /// Column index by name, or None if absent.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Build the standard daily-metric table from rollup rows.
    ///
    /// Columns: blockchain, block_date, metric_type, metric_value.
    pub fn from_daily_rows(rows: &[DailyMetricRow]) -> Self {
        let mut result =
            QueryResult::new(vec!["blockchain", "block_date", "metric_type", "metric_value"]);
        for row in rows {
            result.push_row(vec![
                Value::from(row.source.clone()),
                Value::from(row.date.format("%Y-%m-%d").to_string()),
                Value::from(row.metric_type.clone()),
                json_number(row.value),
            ]);
        }
        result
    }
}

/// Whole-valued metrics (counts) render as integers, not `2.0`.
fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
