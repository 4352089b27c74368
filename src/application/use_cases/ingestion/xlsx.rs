// ============================================================
// XLSX PARSER
// ============================================================

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use super::RawTable;
use crate::domain::error::{AppError, Result};

/// Parse XLSX bytes: first worksheet, header row = column names,
/// empty cells = nulls, everything else stringified.
pub(super) fn parse_xlsx(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| AppError::ParseError(format!("Failed to open Excel file: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ParseError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read Excel range: {}", e)))?;

    let mut rows_iter = range.rows();
    let header_row = rows_iter
        .next()
        .ok_or_else(|| AppError::ParseError("Worksheet is empty".to_string()))?;

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell_to_raw(cell).unwrap_or_default())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::ParseError("File has no header row".to_string()));
    }

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for row in rows_iter {
        let raw: Vec<Option<String>> = row
            .iter()
            .take(headers.len())
            .map(cell_to_raw)
            .collect();

        if raw.iter().all(|f| f.is_none()) {
            continue;
        }

        rows.push(raw);
    }

    Ok((headers, rows))
}

/// Stringify one worksheet cell; empty and error cells are missing
fn cell_to_raw(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        other => Some(format!("{}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_raw() {
        assert_eq!(cell_to_raw(&Data::Empty), None);
        assert_eq!(cell_to_raw(&Data::String("  ".to_string())), None);
        assert_eq!(
            cell_to_raw(&Data::String(" x ".to_string())),
            Some("x".to_string())
        );
        assert_eq!(cell_to_raw(&Data::Int(3)), Some("3".to_string()));
        assert_eq!(cell_to_raw(&Data::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(cell_to_raw(&Data::Bool(true)), Some("true".to_string()));
    }

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let result = parse_xlsx(b"definitely not a zip archive");
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }
}
