// ============================================================
// DATASET SESSION
// ============================================================
// The single owner of the active store. Every user action goes
// through this handle: upload replaces the dataset wholesale, the
// other operations read or mutate it synchronously. Exactly one
// writer exists, so no locking is involved.

use tracing::info;

use crate::domain::chart::{ChartOptions, ChartRequest};
use crate::domain::error::{AppError, Result};
use crate::domain::fill_policy::FillPolicy;
use crate::domain::summary::TableSummary;
use crate::domain::table::{CellValue, ColumnKind, TableStore};

use super::charts;
use super::export::{self, ExportFormat};
use super::ingestion;
use super::profile;
use super::transform::{self, ImputationReport, RemovalReport};

/// One user's dataset and the operations on it
#[derive(Debug, Default)]
pub struct DatasetSession {
    store: Option<TableStore>,
}

impl DatasetSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active dataset with a freshly ingested one.
    ///
    /// The previous store is torn down before parsing starts; a failed
    /// upload therefore leaves no store installed, never a partial or
    /// stale one.
    pub fn upload(&mut self, bytes: &[u8], filename: &str) -> Result<&TableStore> {
        self.store = None;

        let extension = filename.rsplit('.').next().filter(|ext| *ext != filename);
        let extension = extension.ok_or_else(|| {
            AppError::UnsupportedFormat(format!("File name has no extension: {}", filename))
        })?;

        let store = ingestion::ingest(bytes, extension)?;
        Ok(self.store.insert(store))
    }

    /// The active dataset, if one is loaded
    pub fn store(&self) -> Option<&TableStore> {
        self.store.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_some()
    }

    /// Discard the active dataset
    pub fn clear(&mut self) {
        if self.store.take().is_some() {
            info!("Dataset discarded");
        }
    }

    pub fn remove_columns(&mut self, requested: &[String]) -> Result<RemovalReport> {
        let store = self.require_store_mut()?;
        Ok(transform::remove_columns(store, requested))
    }

    pub fn impute_missing(&mut self, policy: &FillPolicy) -> Result<ImputationReport> {
        let store = self.require_store_mut()?;
        Ok(transform::impute_missing(store, policy))
    }

    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>> {
        export::export(self.require_store()?, format)
    }

    pub fn summary(&self) -> Result<TableSummary> {
        Ok(profile::summarize(self.require_store()?))
    }

    pub fn head(&self, n: usize) -> Result<Vec<Vec<CellValue>>> {
        Ok(profile::head(self.require_store()?, n))
    }

    pub fn column_kinds(&self) -> Result<Vec<(String, ColumnKind)>> {
        Ok(profile::column_kinds(self.require_store()?))
    }

    pub fn render_chart(&self, request: &ChartRequest, options: &ChartOptions) -> Result<Vec<u8>> {
        charts::render_chart(self.require_store()?, request, options)
    }

    fn require_store(&self) -> Result<&TableStore> {
        self.store
            .as_ref()
            .ok_or_else(|| AppError::ValidationError("No dataset loaded".to_string()))
    }

    fn require_store_mut(&mut self) -> Result<&mut TableStore> {
        self.store
            .as_mut()
            .ok_or_else(|| AppError::ValidationError("No dataset loaded".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fill_policy::{NumericFill, TextFill};

    const SAMPLE_CSV: &str = "\
id,score,city
1,10,NYC
2,,LA
3,30,";

    #[test]
    fn test_upload_installs_store() {
        let mut session = DatasetSession::new();
        assert!(!session.is_loaded());

        let store = session.upload(SAMPLE_CSV.as_bytes(), "data.csv").unwrap();
        assert_eq!(store.shape(), (3, 3));
        assert!(session.is_loaded());
    }

    #[test]
    fn test_failed_upload_leaves_no_store() {
        let mut session = DatasetSession::new();
        session.upload(SAMPLE_CSV.as_bytes(), "data.csv").unwrap();

        let result = session.upload(b"whatever", "notes.txt");
        assert!(matches!(result, Err(AppError::UnsupportedFormat(_))));
        assert!(!session.is_loaded());
    }

    #[test]
    fn test_upload_without_extension_is_rejected() {
        let mut session = DatasetSession::new();
        let result = session.upload(SAMPLE_CSV.as_bytes(), "data");
        assert!(matches!(result, Err(AppError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_operations_require_a_dataset() {
        let mut session = DatasetSession::new();
        assert!(matches!(
            session.export(ExportFormat::Csv),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            session.remove_columns(&["id".to_string()]),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(session.summary(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_full_clean_and_export_flow() {
        let mut session = DatasetSession::new();
        session.upload(SAMPLE_CSV.as_bytes(), "data.csv").unwrap();

        let policy = FillPolicy::new(NumericFill::Mean, TextFill::Unknown, None);
        let report = session.impute_missing(&policy).unwrap();
        assert_eq!(report.total_filled(), 2);

        let removal = session.remove_columns(&["id".to_string()]).unwrap();
        assert!(removal.did_remove());

        let summary = session.summary().unwrap();
        assert_eq!(summary.column_count, 2);
        assert_eq!(summary.total_nulls(), 0);

        let bytes = session.export(ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("score,city\n"));
        assert!(text.contains("Unknown"));
    }

    #[test]
    fn test_clear_discards_dataset() {
        let mut session = DatasetSession::new();
        session.upload(SAMPLE_CSV.as_bytes(), "data.csv").unwrap();
        session.clear();
        assert!(!session.is_loaded());
    }
}
