//! In-memory tabular dataset engine behind an interactive
//! data-cleaning UI: ingest an uploaded CSV/XLSX byte stream, inspect
//! it, drop columns, fill missing values, render column charts as PNG
//! bytes, and re-serialize to CSV or XLSX for download.
//!
//! The UI layer owns widgets and file pickers; this crate owns the
//! dataset. [`DatasetSession`] is the single entry point: it holds the
//! one active [`TableStore`] and runs every operation against it
//! synchronously.
//!
//! ```
//! use dataprep::{DatasetSession, ExportFormat, FillPolicy, NumericFill, TextFill};
//!
//! let mut session = DatasetSession::new();
//! session.upload(b"name,age\nAlice,30\nBob,", "people.csv")?;
//! session.impute_missing(&FillPolicy::new(NumericFill::Mean, TextFill::None, None))?;
//! let csv = session.export(ExportFormat::Csv)?;
//! # assert!(!csv.is_empty());
//! # Ok::<(), dataprep::AppError>(())
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::use_cases::export::{export, ExportFormat};
pub use application::use_cases::ingestion::ingest;
pub use application::use_cases::profile::{column_kinds, head, summarize};
pub use application::use_cases::session::DatasetSession;
pub use application::use_cases::transform::{
    impute_missing, remove_columns, ColumnFill, ImputationReport, RemovalReport,
};
pub use application::use_cases::charts::render_chart;
pub use domain::chart::{ChartKind, ChartOptions, ChartRequest};
pub use domain::error::{AppError, Result};
pub use domain::fill_policy::{FillPolicy, NumericFill, TextFill};
pub use domain::summary::{ColumnStats, ColumnSummary, NumericStats, TableSummary, TextStats};
pub use domain::table::{CellValue, Column, ColumnKind, TableStore};

/// Install the default tracing subscriber. The embedding UI calls this
/// once at startup; repeated calls are harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
}
