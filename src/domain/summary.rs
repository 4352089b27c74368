// ============================================================
// DATASET SUMMARY
// ============================================================
// Describe-style statistics the overview panel renders after upload

use serde::Serialize;

use super::table::ColumnKind;

/// Kind-specific statistics for one column
#[derive(Debug, Clone, Serialize)]
pub enum ColumnStats {
    /// Absent when the column has no non-null values
    Numeric(Option<NumericStats>),
    Text(TextStats),
}

/// Statistics over the non-null values of a numeric column
#[derive(Debug, Clone, Serialize)]
pub struct NumericStats {
    pub mean: f64,
    /// Sample standard deviation; 0.0 for a single observation
    pub std: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

/// Statistics over the non-null values of a text column
#[derive(Debug, Clone, Serialize)]
pub struct TextStats {
    /// Number of distinct values
    pub unique: usize,

    /// Most frequent value, ties broken by first occurrence
    pub top: Option<String>,

    /// Occurrence count of `top`
    pub top_count: usize,
}

/// Summary of one column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null_count: usize,
    pub null_count: usize,
    pub stats: ColumnStats,
}

/// Summary of the whole dataset
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnSummary>,
}

impl TableSummary {
    /// Total missing values across all columns
    pub fn total_nulls(&self) -> usize {
        self.columns.iter().map(|c| c.null_count).sum()
    }

    /// Get human-readable report
    pub fn report(&self) -> String {
        let mut lines = vec![format!(
            "Dataset: {} rows x {} columns, {} missing values",
            self.row_count,
            self.column_count,
            self.total_nulls()
        )];

        for column in &self.columns {
            let detail = match &column.stats {
                ColumnStats::Numeric(Some(stats)) => format!(
                    "mean {:.2}, std {:.2}, min {}, median {}, max {}",
                    stats.mean, stats.std, stats.min, stats.median, stats.max
                ),
                ColumnStats::Numeric(None) => "no non-null values".to_string(),
                ColumnStats::Text(stats) => match &stats.top {
                    Some(top) => format!(
                        "{} unique, top '{}' ({} occurrences)",
                        stats.unique, top, stats.top_count
                    ),
                    None => "no non-null values".to_string(),
                },
            };

            lines.push(format!(
                "- {} ({}): {} non-null, {} null; {}",
                column.name, column.kind, column.non_null_count, column.null_count, detail
            ));
        }

        lines.join("\n")
    }
}
