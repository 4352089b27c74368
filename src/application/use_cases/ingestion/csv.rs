// ============================================================
// CSV PARSER
// ============================================================

use super::RawTable;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::csv::{decode_bytes, CsvReader};

/// Parse CSV bytes: header row = column names, empty fields = nulls.
/// The delimiter is detected from a sample of the content.
pub(super) fn parse_csv(bytes: &[u8]) -> Result<RawTable> {
    let content = decode_bytes(bytes)?;

    let delimiter = CsvReader::detect_delimiter(&content);
    let reader = CsvReader::new().with_delimiter(delimiter);
    let mut rdr = reader.reader_for(&content);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::ParseError("File has no header row".to_string()));
    }

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .map_err(|e| AppError::ParseError(format!("Failed to parse CSV row {}: {}", idx + 1, e)))?;

        let row: Vec<Option<String>> = record
            .iter()
            .take(headers.len())
            .map(|field| {
                if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                }
            })
            .collect();

        // Blank lines carry no data
        if row.iter().all(|f| f.is_none()) {
            continue;
        }

        rows.push(row);
    }

    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let (headers, rows) = parse_csv(b"a,b\n1,x\n2,y").unwrap();
        assert_eq!(headers, vec!["a", "b"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![Some("1".to_string()), Some("x".to_string())]);
    }

    #[test]
    fn test_empty_fields_become_nulls() {
        let (_, rows) = parse_csv(b"a,b\n1,\n,y").unwrap();
        assert_eq!(rows[0][1], None);
        assert_eq!(rows[1][0], None);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let (_, rows) = parse_csv(b"a,b\n1,x\n\n2,y\n").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_semicolon_delimiter_detected() {
        let (headers, rows) = parse_csv(b"a;b;c\n1;2;3").unwrap();
        assert_eq!(headers, vec!["a", "b", "c"]);
        assert_eq!(rows[0].len(), 3);
    }

    #[test]
    fn test_quoted_fields() {
        let (_, rows) = parse_csv(b"a,b\n\"x, y\",2").unwrap();
        assert_eq!(rows[0][0], Some("x, y".to_string()));
    }
}
