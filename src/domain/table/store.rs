// ============================================================
// TABLE STORE
// ============================================================
// The in-memory dataset: ordered named columns, each single-kinded,
// and rows of cells. One session owns exactly one store at a time;
// mutation goes through &mut methods, never through shared state.

use serde::Serialize;

use super::{CellValue, ColumnKind};
use crate::domain::error::{AppError, Result};

/// A named column and its fixed kind
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The in-memory tabular dataset.
///
/// Invariants, upheld by the constructor and every mutating method:
/// - column names are unique,
/// - every row has exactly one cell per column,
/// - each cell is null or conforms to its column's kind.
#[derive(Debug, Clone, Serialize)]
pub struct TableStore {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
}

impl TableStore {
    /// Build a store, validating the invariants once up front
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        for (idx, column) in columns.iter().enumerate() {
            if columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(AppError::ParseError(format!(
                    "Duplicate column name: {}",
                    column.name
                )));
            }
        }

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(AppError::ParseError(format!(
                    "Row {} has {} cells, expected {}",
                    row_idx + 1,
                    row.len(),
                    columns.len()
                )));
            }

            for (cell, column) in row.iter().zip(columns.iter()) {
                if !cell.conforms_to(column.kind) {
                    return Err(AppError::ParseError(format!(
                        "Row {} holds a non-{} value in column {}",
                        row_idx + 1,
                        column.kind,
                        column.name
                    )));
                }
            }
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// (row count, column count)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cells of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Number of missing values in one column
    pub fn null_count(&self, index: usize) -> usize {
        self.column_values(index).filter(|v| v.is_null()).count()
    }

    /// Indices of all columns kinded numeric, in column order
    pub fn numeric_column_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == ColumnKind::Numeric)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Drop the columns at the given positions from the column list and
    /// from every row. Indices outside the column range are ignored.
    pub(crate) fn drop_columns(&mut self, indices: &[usize]) {
        let (_, width) = self.shape();
        let mut keep = vec![true; width];
        for &idx in indices {
            if idx < width {
                keep[idx] = false;
            }
        }

        let mut slot = 0;
        self.columns.retain(|_| {
            let keeping = keep[slot];
            slot += 1;
            keeping
        });

        for row in &mut self.rows {
            let mut slot = 0;
            row.retain(|_| {
                let keeping = keep[slot];
                slot += 1;
                keeping
            });
        }
    }

    /// Replace every null in one column with the given value, returning
    /// how many cells changed. The replacement must conform to the
    /// column's kind; a mismatched value leaves the store untouched.
    pub(crate) fn fill_column_nulls(&mut self, index: usize, value: CellValue) -> usize {
        if index >= self.columns.len() || !value.conforms_to(self.columns[index].kind) {
            return 0;
        }

        let mut filled = 0;
        for row in &mut self.rows {
            if row[index].is_null() {
                row[index] = value.clone();
                filled += 1;
            }
        }

        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> TableStore {
        TableStore::new(
            vec![
                Column::new("age", ColumnKind::Numeric),
                Column::new("city", ColumnKind::Text),
            ],
            vec![
                vec![CellValue::Number(30.0), CellValue::Text("NYC".to_string())],
                vec![CellValue::Null, CellValue::Text("LA".to_string())],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_shape_and_lookup() {
        let store = sample_store();
        assert_eq!(store.shape(), (2, 2));
        assert_eq!(store.column_index("city"), Some(1));
        assert_eq!(store.column_index("nope"), None);
        assert_eq!(store.null_count(0), 1);
        assert_eq!(store.null_count(1), 0);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = TableStore::new(
            vec![
                Column::new("a", ColumnKind::Text),
                Column::new("a", ColumnKind::Text),
            ],
            vec![],
        );
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = TableStore::new(
            vec![Column::new("a", ColumnKind::Text)],
            vec![vec![
                CellValue::Text("x".to_string()),
                CellValue::Text("y".to_string()),
            ]],
        );
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }

    #[test]
    fn test_rejects_kind_mismatch() {
        let result = TableStore::new(
            vec![Column::new("a", ColumnKind::Numeric)],
            vec![vec![CellValue::Text("x".to_string())]],
        );
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }

    #[test]
    fn test_drop_columns() {
        let mut store = sample_store();
        store.drop_columns(&[0]);
        assert_eq!(store.shape(), (2, 1));
        assert_eq!(store.column_names(), vec!["city"]);
        assert_eq!(store.rows()[0].len(), 1);
    }

    #[test]
    fn test_fill_column_nulls() {
        let mut store = sample_store();
        let filled = store.fill_column_nulls(0, CellValue::Number(99.0));
        assert_eq!(filled, 1);
        assert_eq!(store.null_count(0), 0);

        // A mismatched kind is a no-op
        let filled = store.fill_column_nulls(1, CellValue::Number(1.0));
        assert_eq!(filled, 0);
    }
}
