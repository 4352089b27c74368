// ============================================================
// PROFILE USE CASE
// ============================================================
// Read-only dataset inspection: describe-style statistics, missing
// value counts, previews. Feeds the overview panel after upload.

use std::collections::HashMap;

use crate::domain::summary::{ColumnStats, ColumnSummary, NumericStats, TableSummary, TextStats};
use crate::domain::table::{CellValue, ColumnKind, TableStore};

use super::transform::{mean, median};

/// Compute per-column statistics over the whole store
pub fn summarize(store: &TableStore) -> TableSummary {
    let (row_count, column_count) = store.shape();

    let columns = store
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let null_count = store.null_count(index);
            let non_null_count = row_count - null_count;

            let stats = match column.kind {
                ColumnKind::Numeric => ColumnStats::Numeric(numeric_stats(store, index)),
                ColumnKind::Text => ColumnStats::Text(text_stats(store, index)),
            };

            ColumnSummary {
                name: column.name.clone(),
                kind: column.kind,
                non_null_count,
                null_count,
                stats,
            }
        })
        .collect();

    TableSummary {
        row_count,
        column_count,
        columns,
    }
}

/// First `n` rows for preview display
pub fn head(store: &TableStore, n: usize) -> Vec<Vec<CellValue>> {
    let count = n.min(store.rows().len());
    store.rows()[..count].to_vec()
}

/// (name, kind) listing for the column information panel
pub fn column_kinds(store: &TableStore) -> Vec<(String, ColumnKind)> {
    store
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.kind))
        .collect()
}

fn numeric_stats(store: &TableStore, index: usize) -> Option<NumericStats> {
    let values: Vec<f64> = store
        .column_values(index)
        .filter_map(|v| v.as_number())
        .collect();

    if values.is_empty() {
        return None;
    }

    let mean = mean(&values);
    let std = if values.len() < 2 {
        0.0
    } else {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (values.len() - 1) as f64).sqrt()
    };

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    Some(NumericStats {
        mean,
        std,
        min,
        median: median(&values),
        max,
    })
}

fn text_stats(store: &TableStore, index: usize) -> TextStats {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in store.column_values(index).enumerate() {
        if let Some(text) = value.as_text() {
            let entry = counts.entry(text).or_insert((position, 0));
            entry.1 += 1;
        }
    }

    let unique = counts.len();
    let top = counts
        .iter()
        .max_by(|a, b| a.1 .1.cmp(&b.1 .1).then(b.1 .0.cmp(&a.1 .0)))
        .map(|(text, (_, count))| (text.to_string(), *count));

    match top {
        Some((top, top_count)) => TextStats {
            unique,
            top: Some(top),
            top_count,
        },
        None => TextStats {
            unique: 0,
            top: None,
            top_count: 0,
        },
    }
}
