pub mod use_cases;

pub use use_cases::charts::render_chart;
pub use use_cases::export::{export, ExportFormat};
pub use use_cases::ingestion::ingest;
pub use use_cases::profile::{column_kinds, head, summarize};
pub use use_cases::session::DatasetSession;
pub use use_cases::transform::{
    impute_missing, remove_columns, ColumnFill, ImputationReport, RemovalReport,
};
