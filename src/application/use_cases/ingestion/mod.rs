// ============================================================
// INGESTION USE CASE
// ============================================================
// Turn an uploaded byte stream plus a declared extension into a
// typed TableStore, or fail without leaving partial state behind

mod csv;
mod xlsx;

use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{parses_as_number, CellValue, Column, ColumnKind, TableStore};

/// Raw parse output shared by both formats: header names plus rows of
/// optional field values (None = missing)
pub(crate) type RawTable = (Vec<String>, Vec<Vec<Option<String>>>);

/// Parse uploaded bytes into a store. Only `csv` and `xlsx` are
/// accepted; any other declared extension fails before a parse is
/// attempted.
pub fn ingest(bytes: &[u8], declared_extension: &str) -> Result<TableStore> {
    let extension = declared_extension
        .trim()
        .trim_start_matches('.')
        .to_lowercase();

    let (headers, raw_rows) = match extension.as_str() {
        "csv" => csv::parse_csv(bytes)?,
        "xlsx" => xlsx::parse_xlsx(bytes)?,
        other => {
            return Err(AppError::UnsupportedFormat(format!(
                "Unsupported file type: {}",
                if other.is_empty() { "(none)" } else { other }
            )))
        }
    };

    let store = build_store(headers, raw_rows)?;
    let (rows, cols) = store.shape();
    info!("Ingested {} dataset: {} rows x {} columns", extension, rows, cols);

    Ok(store)
}

/// Infer per-column kinds and build the typed store.
///
/// A column is numeric when every non-null raw value parses as a finite
/// number; a fully-null column is text. Short rows are padded with
/// nulls, overlong rows truncated to the header width.
fn build_store(headers: Vec<String>, raw_rows: Vec<Vec<Option<String>>>) -> Result<TableStore> {
    if headers.is_empty() {
        return Err(AppError::ParseError(
            "File has no header row".to_string(),
        ));
    }

    let width = headers.len();
    let mut raw_rows = raw_rows;
    for row in &mut raw_rows {
        row.resize(width, None);
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut non_null = 0;
            let mut all_numeric = true;
            for row in &raw_rows {
                if let Some(value) = &row[idx] {
                    non_null += 1;
                    if !parses_as_number(value) {
                        all_numeric = false;
                        break;
                    }
                }
            }

            let kind = if non_null > 0 && all_numeric {
                ColumnKind::Numeric
            } else {
                ColumnKind::Text
            };

            Column::new(name, kind)
        })
        .collect();

    let rows: Vec<Vec<CellValue>> = raw_rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(columns.iter())
                .map(|(raw, column)| match raw {
                    None => CellValue::Null,
                    Some(value) => match column.kind {
                        // The inference pass guarantees this parses
                        ColumnKind::Numeric => value
                            .trim()
                            .parse::<f64>()
                            .map(CellValue::Number)
                            .unwrap_or(CellValue::Null),
                        ColumnKind::Text => CellValue::Text(value),
                    },
                })
                .collect()
        })
        .collect();

    TableStore::new(columns, rows)
}
