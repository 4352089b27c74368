// ============================================================
// MISSING-VALUE POLICY
// ============================================================
// Independent fill strategies for numeric and text columns

use serde::{Deserialize, Serialize};

/// Fill strategy for numeric columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericFill {
    None,
    Mean,
    Median,
    Mode,
}

impl std::fmt::Display for NumericFill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericFill::None => write!(f, "None"),
            NumericFill::Mean => write!(f, "Mean"),
            NumericFill::Median => write!(f, "Median"),
            NumericFill::Mode => write!(f, "Mode"),
        }
    }
}

/// Fill strategy for text columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextFill {
    None,
    Mode,
    /// The literal string "Unknown"
    Unknown,
    /// A caller-supplied literal; requires `FillPolicy::custom_literal`
    Custom,
}

impl std::fmt::Display for TextFill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextFill::None => write!(f, "None"),
            TextFill::Mode => write!(f, "Mode"),
            TextFill::Unknown => write!(f, "Fill with 'Unknown'"),
            TextFill::Custom => write!(f, "Custom Value"),
        }
    }
}

/// One strategy per column kind, applied together in a single pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillPolicy {
    pub numeric: NumericFill,
    pub text: TextFill,

    /// Literal used when `text` is `Custom`
    pub custom_literal: Option<String>,
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self {
            numeric: NumericFill::None,
            text: TextFill::None,
            custom_literal: None,
        }
    }
}

impl FillPolicy {
    pub fn new(numeric: NumericFill, text: TextFill, custom_literal: Option<String>) -> Self {
        Self {
            numeric,
            text,
            custom_literal,
        }
    }

    /// The text strategy that will actually run. `Custom` without a
    /// usable literal degrades to `None`; that fallback is defined
    /// behavior, not an error.
    pub fn effective_text_fill(&self) -> TextFill {
        if self.text == TextFill::Custom && !self.has_custom_literal() {
            TextFill::None
        } else {
            self.text
        }
    }

    fn has_custom_literal(&self) -> bool {
        self.custom_literal
            .as_deref()
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }
}
