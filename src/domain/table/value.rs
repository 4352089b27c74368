// ============================================================
// CELL VALUES AND COLUMN KINDS
// ============================================================
// Tagged cell representation; the kind of a column is fixed at
// ingestion and every later mutation must conform to it

use serde::{Deserialize, Serialize};

/// Per-column classification, decided once by value inspection at ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Every non-null raw value parses as a finite number
    Numeric,

    /// Anything else: free text, categories, identifiers
    Text,
}

impl ColumnKind {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "Numeric values stored as 64-bit floats",
            ColumnKind::Text => "Text or categorical values stored as strings",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

/// A single cell in the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Null,
}

impl CellValue {
    /// Whether this cell holds a missing value
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Whether this cell may live in a column of the given kind.
    /// Null is valid in either kind.
    pub fn conforms_to(&self, kind: ColumnKind) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Number(_) => kind == ColumnKind::Numeric,
            CellValue::Text(_) => kind == ColumnKind::Text,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell for serialization; nulls become empty fields
    pub fn render(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Null => String::new(),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Check if a raw string value counts as numeric for kind inference.
/// NaN and infinities are rejected: a column holding them would poison
/// every statistic computed over it.
pub fn parses_as_number(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }

    trimmed.parse::<f64>().map(|n| n.is_finite()).unwrap_or(false)
}
