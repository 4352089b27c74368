// ============================================================
// EXPORT USE CASE
// ============================================================
// Serialize the store to CSV or XLSX bytes. Export reads the store
// and never mutates it; either the full byte stream is produced or
// the call fails with a SerializationError.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::table::{CellValue, TableStore};

/// Target file format for downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// MIME type for the download response
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Serialize the store in the requested format
pub fn export(store: &TableStore, format: ExportFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(store)?,
        ExportFormat::Xlsx => to_xlsx(store)?,
    };

    let (rows, cols) = store.shape();
    info!(
        "Exported {} rows x {} columns as {} ({} bytes)",
        rows,
        cols,
        format,
        bytes.len()
    );

    Ok(bytes)
}

/// Header row in store order, one line per row, nulls as empty fields,
/// standard quoting. No index column.
fn to_csv(store: &TableStore) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(store.column_names())
        .map_err(|e| AppError::SerializationError(format!("Failed to write CSV header: {}", e)))?;

    for row in store.rows() {
        let fields: Vec<String> = row.iter().map(CellValue::render).collect();
        writer
            .write_record(&fields)
            .map_err(|e| AppError::SerializationError(format!("Failed to write CSV row: {}", e)))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::SerializationError(format!("Failed to flush CSV output: {}", e)))
}

/// Single worksheet named Sheet1, header row plus data rows in store
/// order, nulls as empty cells, numbers written as numbers.
fn to_xlsx(store: &TableStore) -> Result<Vec<u8>> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    let xlsx_err =
        |e: rust_xlsxwriter::XlsxError| AppError::SerializationError(format!("Failed to write XLSX: {}", e));

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name("Sheet1").map_err(xlsx_err)?;

    for (col, name) in store.column_names().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *name)
            .map_err(xlsx_err)?;
    }

    for (row_idx, row) in store.rows().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (row_n, col_n) = ((row_idx + 1) as u32, col_idx as u16);
            match cell {
                CellValue::Number(n) => {
                    worksheet.write_number(row_n, col_n, *n).map_err(xlsx_err)?;
                }
                CellValue::Text(s) => {
                    worksheet
                        .write_string(row_n, col_n, s.as_str())
                        .map_err(xlsx_err)?;
                }
                CellValue::Null => {}
            }
        }
    }

    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer().map_err(xlsx_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::ingestion::ingest;

    const SAMPLE_CSV: &str = "\
name,age
Alice,30
Bob,
\"Quote, Me\",25
";

    #[test]
    fn test_csv_round_trip_preserves_values_and_order() {
        let store = ingest(SAMPLE_CSV.as_bytes(), "csv").unwrap();
        let bytes = export(&store, ExportFormat::Csv).unwrap();

        let reloaded = ingest(&bytes, "csv").unwrap();
        assert_eq!(reloaded.column_names(), store.column_names());
        assert_eq!(reloaded.shape(), store.shape());
        assert_eq!(reloaded.rows(), store.rows());
    }

    #[test]
    fn test_csv_renders_nulls_as_empty_fields() {
        let store = ingest(SAMPLE_CSV.as_bytes(), "csv").unwrap();
        let bytes = export(&store, ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("name,age\n"));
        assert!(text.contains("Bob,\n"));
        assert!(text.contains("\"Quote, Me\",25"));
    }

    #[test]
    fn test_xlsx_round_trip() {
        let store = ingest(SAMPLE_CSV.as_bytes(), "csv").unwrap();
        let bytes = export(&store, ExportFormat::Xlsx).unwrap();

        let reloaded = ingest(&bytes, "xlsx").unwrap();
        assert_eq!(reloaded.column_names(), store.column_names());
        assert_eq!(reloaded.shape(), store.shape());
        assert_eq!(reloaded.rows(), store.rows());
    }

    #[test]
    fn test_xlsx_bytes_look_like_a_workbook() {
        let store = ingest(SAMPLE_CSV.as_bytes(), "csv").unwrap();
        let bytes = export(&store, ExportFormat::Xlsx).unwrap();
        // XLSX is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_export_does_not_mutate_store() {
        let store = ingest(SAMPLE_CSV.as_bytes(), "csv").unwrap();
        let before = store.rows().to_vec();
        export(&store, ExportFormat::Csv).unwrap();
        export(&store, ExportFormat::Xlsx).unwrap();
        assert_eq!(store.rows(), before.as_slice());
    }
}
