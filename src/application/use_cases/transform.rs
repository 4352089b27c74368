// ============================================================
// TRANSFORMATION PIPELINE
// ============================================================
// Column removal and missing-value imputation. Both operations take
// exclusive ownership of the store for the duration of the call and
// are idempotent when repeated with the same arguments.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::fill_policy::{FillPolicy, NumericFill, TextFill};
use crate::domain::table::{CellValue, ColumnKind, TableStore};

/// Outcome of a remove-columns request
#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovalReport {
    /// Names actually dropped, in request order
    pub removed: Vec<String>,

    /// Requested names that were not present (silently ignored)
    pub missing: Vec<String>,
}

impl RemovalReport {
    pub fn did_remove(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// Outcome of an imputation pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImputationReport {
    /// One entry per column that had nulls replaced
    pub filled: Vec<ColumnFill>,

    /// Columns whose nulls could not be filled because every value is
    /// null; statistics over nothing are undefined
    pub skipped: Vec<String>,
}

/// Replacement applied to one column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnFill {
    pub column: String,
    pub replacement: CellValue,
    pub count: usize,
}

impl ImputationReport {
    pub fn total_filled(&self) -> usize {
        self.filled.iter().map(|f| f.count).sum()
    }
}

/// Drop the requested columns from the store.
///
/// An empty request is a no-op the caller should surface as a warning,
/// not an error; names absent from the store are ignored. Surviving
/// column order is unchanged.
pub fn remove_columns(store: &mut TableStore, requested: &[String]) -> RemovalReport {
    if requested.is_empty() {
        warn!("Column removal requested with no columns selected");
        return RemovalReport::default();
    }

    let mut report = RemovalReport::default();
    let mut indices = Vec::new();

    for name in requested {
        match store.column_index(name) {
            Some(index) if !indices.contains(&index) => {
                indices.push(index);
                report.removed.push(name.clone());
            }
            Some(_) => {}
            None => {
                warn!("Ignoring removal of unknown column: {}", name);
                report.missing.push(name.clone());
            }
        }
    }

    if !indices.is_empty() {
        store.drop_columns(&indices);
        info!(
            "Removed {} column(s); dataset is now {:?}",
            report.removed.len(),
            store.shape()
        );
    }

    report
}

/// Fill missing values column by column according to the policy.
///
/// Numeric and text columns are treated independently; a column with
/// zero nulls is never touched, and a column that is entirely null is
/// skipped with a warning. Applying the same policy twice yields the
/// same store as applying it once.
pub fn impute_missing(store: &mut TableStore, policy: &FillPolicy) -> ImputationReport {
    let mut report = ImputationReport::default();
    let text_fill = policy.effective_text_fill();

    for index in 0..store.columns().len() {
        let column = &store.columns()[index];
        let (name, kind) = (column.name.clone(), column.kind);

        if store.null_count(index) == 0 {
            continue;
        }

        let replacement = match kind {
            ColumnKind::Numeric => {
                if policy.numeric == NumericFill::None {
                    continue;
                }
                match numeric_replacement(store, index, policy.numeric) {
                    Some(value) => CellValue::Number(value),
                    None => {
                        warn!("Column {} is entirely null; skipping imputation", name);
                        report.skipped.push(name);
                        continue;
                    }
                }
            }
            ColumnKind::Text => match text_fill {
                TextFill::None => continue,
                TextFill::Unknown => CellValue::Text("Unknown".to_string()),
                TextFill::Custom => {
                    // effective_text_fill() only yields Custom with a literal present
                    match policy.custom_literal.clone() {
                        Some(literal) => CellValue::Text(literal),
                        None => continue,
                    }
                }
                TextFill::Mode => match text_mode(store, index) {
                    Some(value) => CellValue::Text(value),
                    None => {
                        warn!("Column {} is entirely null; skipping imputation", name);
                        report.skipped.push(name);
                        continue;
                    }
                },
            },
        };

        let count = store.fill_column_nulls(index, replacement.clone());
        info!("Filled {} null(s) in column {}", count, name);
        report.filled.push(ColumnFill {
            column: name,
            replacement,
            count,
        });
    }

    report
}

/// Statistic over the non-null values of a numeric column; None when
/// there are no non-null values
fn numeric_replacement(store: &TableStore, index: usize, fill: NumericFill) -> Option<f64> {
    let values: Vec<f64> = store
        .column_values(index)
        .filter_map(|v| v.as_number())
        .collect();

    if values.is_empty() {
        return None;
    }

    match fill {
        NumericFill::None => None,
        NumericFill::Mean => Some(mean(&values)),
        NumericFill::Median => Some(median(&values)),
        NumericFill::Mode => numeric_mode(&values),
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; the midpoint of the two middle values for an even count
pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value, ties broken by first occurrence in column order
fn numeric_mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, (usize, usize)> = HashMap::new();
    for (position, &value) in values.iter().enumerate() {
        let entry = counts.entry(value.to_bits()).or_insert((position, 0));
        entry.1 += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1 .1.cmp(&b.1 .1).then(b.1 .0.cmp(&a.1 .0)))
        .map(|(bits, _)| f64::from_bits(bits))
}

/// Most frequent non-null text value, first-occurrence tie-break
fn text_mode(store: &TableStore, index: usize) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in store.column_values(index).enumerate() {
        if let Some(text) = value.as_text() {
            let entry = counts.entry(text).or_insert((position, 0));
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1 .1.cmp(&b.1 .1).then(b.1 .0.cmp(&a.1 .0)))
        .map(|(text, _)| text.to_string())
}
