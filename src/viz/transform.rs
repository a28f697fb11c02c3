//! Result-to-visualization transformer
//!
//! Pure function from a query result plus a widget configuration to a
//! render model. Fields are resolved by column name; a missing required
//! field yields `RenderModel::NoData` instead of an error, so a widget
//! pointed at the wrong query degrades to an empty chart.

use crate::query::QueryResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Scatter,
    Pie,
    Counter,
    Pivot,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Sum,
    Count,
    Avg,
    Min,
    Max,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub chart_kind: ChartKind,
    pub x_field: String,
    pub y_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by_field: Option<String>,
    pub aggregation: Aggregation,
}

/// Chart-kind-specific render model consumed by the dashboard frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderModel {
    /// A required field was missing, or there is nothing to draw.
    NoData,
    /// bar / line / area / pie: labels from the x column, coerced values
    /// from the y column.
    Series {
        chart: ChartKind,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Scatter { points: Vec<(f64, f64)> },
    Counter { value: f64 },
    /// Sparse cross-tab: rows keyed by the group-by column, columns by
    /// the x column, both in first-appearance order. Cells untouched by
    /// any row stay `None`.
    Pivot {
        row_keys: Vec<String>,
        col_keys: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    },
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
}

/// Transform a query result into a render model. Deterministic; no
/// caching, no side effects.
pub fn transform(result: &QueryResult, config: &WidgetConfig) -> RenderModel {
    match config.chart_kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Area | ChartKind::Pie => {
            series_model(result, config)
        }
        ChartKind::Scatter => scatter_model(result, config),
        ChartKind::Counter => counter_model(result, config),
        ChartKind::Pivot => pivot_model(result, config),
        ChartKind::Table => RenderModel::Table {
            columns: result.columns.clone(),
            rows: result.rows.clone(),
        },
    }
}

fn series_model(result: &QueryResult, config: &WidgetConfig) -> RenderModel {
    let (Some(x), Some(y)) = (
        result.column_index(&config.x_field),
        result.column_index(&config.y_field),
    ) else {
        return RenderModel::NoData;
    };

    RenderModel::Series {
        chart: config.chart_kind,
        labels: result.rows.iter().map(|row| label_of(cell(row, x))).collect(),
        values: result
            .rows
            .iter()
            .map(|row| coerce_number(cell(row, y)))
            .collect(),
    }
}

fn scatter_model(result: &QueryResult, config: &WidgetConfig) -> RenderModel {
    let (Some(x), Some(y)) = (
        result.column_index(&config.x_field),
        result.column_index(&config.y_field),
    ) else {
        return RenderModel::NoData;
    };

    RenderModel::Scatter {
        points: result
            .rows
            .iter()
            .map(|row| (coerce_number(cell(row, x)), coerce_number(cell(row, y))))
            .collect(),
    }
}

fn counter_model(result: &QueryResult, config: &WidgetConfig) -> RenderModel {
    // count is a pure row count and ignores the y field entirely
    if config.aggregation == Aggregation::Count {
        return RenderModel::Counter {
            value: result.rows.len() as f64,
        };
    }

    let Some(y) = result.column_index(&config.y_field) else {
        return RenderModel::NoData;
    };

    let values: Vec<f64> = result
        .rows
        .iter()
        .map(|row| coerce_number(cell(row, y)))
        .collect();
    let value = match config.aggregation {
        Aggregation::Count => unreachable!(),
        Aggregation::Sum => values.iter().sum(),
        Aggregation::Avg => {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        }
        // Empty set collapses to 0, same convention as avg
        Aggregation::Min => values.iter().cloned().fold(None, fold_min).unwrap_or(0.0),
        Aggregation::Max => values.iter().cloned().fold(None, fold_max).unwrap_or(0.0),
    };

    RenderModel::Counter { value }
}

fn pivot_model(result: &QueryResult, config: &WidgetConfig) -> RenderModel {
    let Some(group_field) = config.group_by_field.as_deref() else {
        return RenderModel::NoData;
    };
    let (Some(group), Some(x)) = (
        result.column_index(group_field),
        result.column_index(&config.x_field),
    ) else {
        return RenderModel::NoData;
    };
    // count buckets need no value column; everything else does
    let y = match config.aggregation {
        Aggregation::Count => None,
        _ => match result.column_index(&config.y_field) {
            Some(idx) => Some(idx),
            None => return RenderModel::NoData,
        },
    };

    let mut row_keys: Vec<String> = Vec::new();
    let mut col_keys: Vec<String> = Vec::new();
    let mut cells: Vec<Vec<Option<f64>>> = Vec::new();

    for row in &result.rows {
        let row_key = label_of(cell(row, group));
        let col_key = label_of(cell(row, x));

        let ri = match row_keys.iter().position(|k| *k == row_key) {
            Some(i) => i,
            None => {
                row_keys.push(row_key);
                cells.push(vec![None; col_keys.len()]);
                row_keys.len() - 1
            }
        };
        let ci = match col_keys.iter().position(|k| *k == col_key) {
            Some(i) => i,
            None => {
                col_keys.push(col_key);
                for cell_row in cells.iter_mut() {
                    cell_row.push(None);
                }
                col_keys.len() - 1
            }
        };

        let value = y.map(|idx| coerce_number(cell(row, idx))).unwrap_or(0.0);
        let cell = &mut cells[ri][ci];
        *cell = Some(match (config.aggregation, *cell) {
            (Aggregation::Count, cur) => cur.unwrap_or(0.0) + 1.0,
            (Aggregation::Sum, cur) => cur.unwrap_or(0.0) + value,
            // avg keeps accumulating a running sum here instead of a
            // mean; deployed pivot widgets render exactly this value, so
            // changing it to a true mean would silently reshape them.
            (Aggregation::Avg, cur) => cur.unwrap_or(0.0) + value,
            (Aggregation::Min, Some(cur)) => cur.min(value),
            (Aggregation::Min, None) => value,
            (Aggregation::Max, Some(cur)) => cur.max(value),
            (Aggregation::Max, None) => value,
        });
    }

    RenderModel::Pivot {
        row_keys,
        col_keys,
        cells,
    }
}

/// Row access that tolerates ragged rows. Deserialized results carry no
/// width guarantee, so a short row reads as `Null` instead of panicking.
fn cell(row: &[Value], idx: usize) -> &Value {
    static NULL: Value = Value::Null;
    row.get(idx).unwrap_or(&NULL)
}

/// Best-effort numeric coercion. Anything unparseable is 0, a known
/// limitation kept so one bad cell cannot take down a whole chart.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn fold_min(acc: Option<f64>, v: f64) -> Option<f64> {
    Some(acc.map_or(v, |a| a.min(v)))
}

fn fold_max(acc: Option<f64>, v: f64) -> Option<f64> {
    Some(acc.map_or(v, |a| a.max(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_column_result(rows: Vec<(&str, Value)>) -> QueryResult {
        let mut result = QueryResult::new(vec!["category", "amount"]);
        for (cat, amount) in rows {
            result.push_row(vec![Value::from(cat), amount]);
        }
        result
    }

    fn config(chart_kind: ChartKind, aggregation: Aggregation) -> WidgetConfig {
        WidgetConfig {
            chart_kind,
            x_field: "category".to_string(),
            y_field: "amount".to_string(),
            group_by_field: None,
            aggregation,
        }
    }

    #[test]
    fn test_pie_scenario() {
        let result = two_column_result(vec![
            ("A", Value::from(10)),
            ("B", Value::from(30)),
            ("C", Value::from(60)),
        ]);

        let model = transform(&result, &config(ChartKind::Pie, Aggregation::Sum));
        assert_eq!(
            model,
            RenderModel::Series {
                chart: ChartKind::Pie,
                labels: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                values: vec![10.0, 30.0, 60.0],
            }
        );
    }

    #[test]
    fn test_missing_field_is_no_data_for_every_kind() {
        let result = two_column_result(vec![("A", Value::from(1))]);
        let kinds = [
            ChartKind::Bar,
            ChartKind::Line,
            ChartKind::Area,
            ChartKind::Pie,
            ChartKind::Scatter,
            ChartKind::Counter,
            ChartKind::Pivot,
        ];

        for kind in kinds {
            let mut cfg = config(kind, Aggregation::Sum);
            cfg.y_field = "does_not_exist".to_string();
            cfg.group_by_field = Some("category".to_string());
            assert_eq!(transform(&result, &cfg), RenderModel::NoData, "{:?}", kind);
        }
    }

    #[test]
    fn test_unparseable_cell_coerces_to_zero() {
        let result = two_column_result(vec![
            ("A", Value::from(1)),
            ("B", Value::from("abc")),
            ("C", Value::from(3)),
        ]);

        let model = transform(&result, &config(ChartKind::Counter, Aggregation::Sum));
        assert_eq!(model, RenderModel::Counter { value: 4.0 });

        let model = transform(&result, &config(ChartKind::Bar, Aggregation::Sum));
        match model {
            RenderModel::Series { values, .. } => assert_eq!(values, vec![1.0, 0.0, 3.0]),
            other => panic!("unexpected model: {:?}", other),
        }
    }

    #[test]
    fn test_numeric_strings_do_parse() {
        assert_eq!(coerce_number(&Value::from(" 2.5 ")), 2.5);
        assert_eq!(coerce_number(&Value::from("2.5")), 2.5);
        assert_eq!(coerce_number(&Value::Null), 0.0);
        assert_eq!(coerce_number(&Value::from(true)), 0.0);
    }

    #[test]
    fn test_counter_count_ignores_y_field() {
        let result = two_column_result(vec![("A", Value::from(1)), ("B", Value::from(2))]);
        let mut cfg = config(ChartKind::Counter, Aggregation::Count);
        cfg.y_field = "does_not_exist".to_string();

        assert_eq!(transform(&result, &cfg), RenderModel::Counter { value: 2.0 });
    }

    #[test]
    fn test_counter_aggregations() {
        let result = two_column_result(vec![
            ("A", Value::from(4)),
            ("B", Value::from(6)),
            ("C", Value::from(2)),
        ]);

        let cases = [
            (Aggregation::Sum, 12.0),
            (Aggregation::Avg, 4.0),
            (Aggregation::Min, 2.0),
            (Aggregation::Max, 6.0),
        ];
        for (agg, expected) in cases {
            assert_eq!(
                transform(&result, &config(ChartKind::Counter, agg)),
                RenderModel::Counter { value: expected },
                "{:?}",
                agg
            );
        }
    }

    #[test]
    fn test_counter_empty_set_conventions() {
        let result = two_column_result(vec![]);
        for agg in [Aggregation::Avg, Aggregation::Min, Aggregation::Max] {
            assert_eq!(
                transform(&result, &config(ChartKind::Counter, agg)),
                RenderModel::Counter { value: 0.0 },
                "{:?}",
                agg
            );
        }
    }

    #[test]
    fn test_scatter_pairs() {
        let mut result = QueryResult::new(vec!["x", "y"]);
        result.push_row(vec![Value::from(1), Value::from(10)]);
        result.push_row(vec![Value::from("2"), Value::from(20)]);

        let mut cfg = config(ChartKind::Scatter, Aggregation::Sum);
        cfg.x_field = "x".to_string();
        cfg.y_field = "y".to_string();

        assert_eq!(
            transform(&result, &cfg),
            RenderModel::Scatter {
                points: vec![(1.0, 10.0), (2.0, 20.0)],
            }
        );
    }

    #[test]
    fn test_table_passthrough() {
        let result = two_column_result(vec![("A", Value::from("abc"))]);
        let model = transform(&result, &config(ChartKind::Table, Aggregation::Sum));
        assert_eq!(
            model,
            RenderModel::Table {
                columns: result.columns.clone(),
                rows: result.rows.clone(),
            }
        );
    }

    fn pivot_result() -> QueryResult {
        let mut result = QueryResult::new(vec!["chain", "day", "value"]);
        for (chain, day, value) in [
            ("starknet", "mon", 10),
            ("starknet", "mon", 30),
            ("starknet", "tue", 5),
            ("ethereum", "tue", 7),
        ] {
            result.push_row(vec![Value::from(chain), Value::from(day), Value::from(value)]);
        }
        result
    }

    fn pivot_config(aggregation: Aggregation) -> WidgetConfig {
        WidgetConfig {
            chart_kind: ChartKind::Pivot,
            x_field: "day".to_string(),
            y_field: "value".to_string(),
            group_by_field: Some("chain".to_string()),
            aggregation,
        }
    }

    #[test]
    fn test_pivot_sparse_matrix() {
        let model = transform(&pivot_result(), &pivot_config(Aggregation::Sum));
        assert_eq!(
            model,
            RenderModel::Pivot {
                row_keys: vec!["starknet".to_string(), "ethereum".to_string()],
                col_keys: vec!["mon".to_string(), "tue".to_string()],
                cells: vec![
                    vec![Some(40.0), Some(5.0)],
                    vec![None, Some(7.0)], // ethereum has no mon bucket
                ],
            }
        );
    }

    #[test]
    fn test_pivot_avg_is_a_running_sum() {
        // avg cells accumulate, they do not divide
        let model = transform(&pivot_result(), &pivot_config(Aggregation::Avg));
        match model {
            RenderModel::Pivot { cells, .. } => assert_eq!(cells[0][0], Some(40.0)),
            other => panic!("unexpected model: {:?}", other),
        }
    }

    #[test]
    fn test_pivot_count_and_min_max() {
        let model = transform(&pivot_result(), &pivot_config(Aggregation::Count));
        match model {
            RenderModel::Pivot { cells, .. } => {
                assert_eq!(cells[0][0], Some(2.0));
                assert_eq!(cells[1][0], None);
            }
            other => panic!("unexpected model: {:?}", other),
        }

        let model = transform(&pivot_result(), &pivot_config(Aggregation::Min));
        match model {
            RenderModel::Pivot { cells, .. } => assert_eq!(cells[0][0], Some(10.0)),
            other => panic!("unexpected model: {:?}", other),
        }

        let model = transform(&pivot_result(), &pivot_config(Aggregation::Max));
        match model {
            RenderModel::Pivot { cells, .. } => assert_eq!(cells[0][0], Some(30.0)),
            other => panic!("unexpected model: {:?}", other),
        }
    }

    #[test]
    fn test_ragged_deserialized_rows_do_not_panic() {
        // Deserialization bypasses push_row, so a row can be short
        let result: QueryResult = serde_json::from_str(
            r#"{"columns": ["category", "amount"], "rows": [["A", 5], ["B"]]}"#,
        )
        .unwrap();

        let model = transform(&result, &config(ChartKind::Bar, Aggregation::Sum));
        match model {
            RenderModel::Series { values, .. } => assert_eq!(values, vec![5.0, 0.0]),
            other => panic!("unexpected model: {:?}", other),
        }

        let mut cfg = config(ChartKind::Pivot, Aggregation::Sum);
        cfg.group_by_field = Some("category".to_string());
        cfg.x_field = "amount".to_string();
        cfg.y_field = "amount".to_string();
        match transform(&result, &cfg) {
            RenderModel::Pivot { row_keys, .. } => {
                assert_eq!(row_keys, vec!["A".to_string(), "B".to_string()]);
            }
            other => panic!("unexpected model: {:?}", other),
        }

        assert_eq!(
            transform(&result, &config(ChartKind::Counter, Aggregation::Sum)),
            RenderModel::Counter { value: 5.0 }
        );
    }

    #[test]
    fn test_transform_is_deterministic() {
        let result = pivot_result();
        let cfg = pivot_config(Aggregation::Sum);
        assert_eq!(transform(&result, &cfg), transform(&result, &cfg));
    }
}
