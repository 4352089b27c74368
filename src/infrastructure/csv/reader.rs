// ============================================================
// CSV READER
// ============================================================
// Byte decoding, delimiter detection, and reader construction for
// uploaded CSV content

use csv::{Reader, ReaderBuilder, Trim};

use crate::domain::error::{AppError, Result};

/// Decode an uploaded byte stream to text. Strict UTF-8 first, then a
/// WINDOWS_1252 fallback for the legacy exports spreadsheet tools still
/// produce.
pub fn decode_bytes(bytes: &[u8]) -> Result<String> {
    if let Ok(content) = std::str::from_utf8(bytes) {
        return Ok(content.to_string());
    }

    let (content, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
    if had_errors {
        return Err(AppError::ParseError(
            "File is not valid UTF-8 or WINDOWS-1252 text".to_string(),
        ));
    }

    Ok(content.into_owned())
}

/// CSV reader configuration
pub struct CsvReader {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvReader {
    /// Create a new CSV reader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Build the underlying reader over string content. Headers are
    /// consumed by the caller; rows of uneven width are allowed and
    /// padded downstream.
    pub fn reader_for<'a>(&self, content: &'a str) -> Reader<&'a [u8]> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true)
            .from_reader(content.as_bytes())
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe) by
    /// scoring each candidate on per-line frequency and consistency
    /// over a sample of lines.
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            let avg = counts.iter().sum::<usize>() as f32 / counts.len() as f32;
            let variance = counts
                .iter()
                .map(|&n| (n as f32 - avg).powi(2))
                .sum::<f32>()
                / counts.len() as f32;

            // Frequent and consistent across lines wins
            let score = avg / (1.0 + variance.sqrt());
            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}
