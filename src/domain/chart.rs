// ============================================================
// CHART REQUESTS
// ============================================================
// The minimal parameter set the presentation layer sends to get a
// visualization out of the store; validation lives here so a bad
// request never reaches the rendering backend

use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};
use super::table::{ColumnKind, TableStore};

/// Available plot kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    /// One line per selected column against row index
    Line,

    /// Grouped bars per selected column against row index
    Bar,

    /// First selected column on x, second on y
    Scatter,

    /// One semi-transparent distribution per selected column
    Histogram,

    /// Pairwise Pearson correlation over all numeric columns,
    /// rendered as an annotated grid; ignores the column selection
    CorrelationHeatmap,
}

impl ChartKind {
    /// Display name shown in the UI
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line Plot",
            ChartKind::Bar => "Bar Plot",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Histogram => "Histogram",
            ChartKind::CorrelationHeatmap => "Correlation Heatmap",
        }
    }

    /// Download file name for the rendered PNG: the lowercased label
    /// with spaces replaced by underscores
    pub fn file_name(&self) -> String {
        format!("{}.png", self.label().to_lowercase().replace(' ', "_"))
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A plot kind plus the columns it should draw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub columns: Vec<String>,
}

impl ChartRequest {
    pub fn new(kind: ChartKind, columns: Vec<String>) -> Self {
        Self { kind, columns }
    }

    /// Check the request against the store before any rendering starts.
    ///
    /// Scatter needs at least two selected columns, the other
    /// column-driven kinds at least one, and every selected column must
    /// exist and be numeric. The correlation heatmap ignores the
    /// selection and instead needs at least two numeric columns in the
    /// store.
    pub fn validate(&self, store: &TableStore) -> Result<()> {
        if self.kind == ChartKind::CorrelationHeatmap {
            if store.numeric_column_indices().len() < 2 {
                return Err(AppError::ValidationError(
                    "Correlation heatmap needs at least two numeric columns".to_string(),
                ));
            }
            return Ok(());
        }

        if self.columns.is_empty() {
            return Err(AppError::ValidationError(
                "Please select columns for plotting.".to_string(),
            ));
        }

        if self.kind == ChartKind::Scatter && self.columns.len() < 2 {
            return Err(AppError::ValidationError(
                "Please select at least two columns for a scatter plot.".to_string(),
            ));
        }

        for name in &self.columns {
            let index = store.column_index(name).ok_or_else(|| {
                AppError::ValidationError(format!("Column not found: {}", name))
            })?;
            if store.columns()[index].kind != ColumnKind::Numeric {
                return Err(AppError::ValidationError(format!(
                    "Column {} is not numeric and cannot be plotted",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Rendering options in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,

    /// Overrides the kind's label as the chart caption
    pub caption: Option<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            caption: None,
        }
    }
}

impl ChartOptions {
    /// Validate option values
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("chart dimensions must be > 0".to_string());
        }
        if self.width > 8192 || self.height > 8192 {
            return Err("chart dimensions must be <= 8192".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{CellValue, Column};

    fn numeric_store() -> TableStore {
        TableStore::new(
            vec![
                Column::new("a", ColumnKind::Numeric),
                Column::new("b", ColumnKind::Numeric),
                Column::new("label", ColumnKind::Text),
            ],
            vec![vec![
                CellValue::Number(1.0),
                CellValue::Number(2.0),
                CellValue::Text("x".to_string()),
            ]],
        )
        .unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(ChartKind::Line.file_name(), "line_plot.png");
        assert_eq!(ChartKind::Bar.file_name(), "bar_plot.png");
        assert_eq!(ChartKind::Scatter.file_name(), "scatter_plot.png");
        assert_eq!(ChartKind::Histogram.file_name(), "histogram.png");
        assert_eq!(
            ChartKind::CorrelationHeatmap.file_name(),
            "correlation_heatmap.png"
        );
    }

    #[test]
    fn test_scatter_needs_two_columns() {
        let store = numeric_store();
        let request = ChartRequest::new(ChartKind::Scatter, vec!["a".to_string()]);
        assert!(matches!(
            request.validate(&store),
            Err(AppError::ValidationError(_))
        ));

        let request = ChartRequest::new(ChartKind::Scatter, vec!["a".to_string(), "b".to_string()]);
        assert!(request.validate(&store).is_ok());
    }

    #[test]
    fn test_empty_selection_rejected() {
        let store = numeric_store();
        let request = ChartRequest::new(ChartKind::Line, vec![]);
        assert!(matches!(
            request.validate(&store),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_text_column_rejected() {
        let store = numeric_store();
        let request = ChartRequest::new(ChartKind::Line, vec!["label".to_string()]);
        assert!(matches!(
            request.validate(&store),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_heatmap_ignores_selection() {
        let store = numeric_store();
        let request = ChartRequest::new(ChartKind::CorrelationHeatmap, vec![]);
        assert!(request.validate(&store).is_ok());
    }

    #[test]
    fn test_options_validation() {
        assert!(ChartOptions::default().validate().is_ok());
        let bad = ChartOptions {
            width: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
