use binsight_catalog::CatalogError;
use binsight_db::DbError;
use binsight_stock::StockError;
use thiserror::Error;

use crate::stage::SyncStage;

/// A sync run failure, tagged with the stage it happened in.
///
/// The `Display` rendering is the human-readable status string surfaced to
/// operators; callers that need the machine-readable cause match on the
/// variant and its source.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("could not construct pipeline clients: {0}")]
    Setup(String),

    #[error("export request failed: {0}")]
    ExportRequest(#[source] CatalogError),

    #[error("export did not complete: {0}")]
    ExportPolling(#[source] CatalogError),

    #[error("export download failed: {0}")]
    Download(#[source] CatalogError),

    #[error("product reconstruction failed: {0}")]
    Reconstruct(#[source] CatalogError),

    #[error("persistence failed: {0}")]
    Persist(#[from] DbError),

    #[error("sync cancelled")]
    Cancelled,
}

impl SyncError {
    /// The pipeline stage the run was in when it failed.
    #[must_use]
    pub fn stage(&self) -> SyncStage {
        match self {
            SyncError::Setup(_) => SyncStage::Idle,
            SyncError::ExportRequest(_) => SyncStage::ExportRequested,
            SyncError::ExportPolling(_) | SyncError::Download(_) => SyncStage::ExportPolling,
            SyncError::Reconstruct(_) => SyncStage::Reconstructing,
            SyncError::Persist(_) => SyncStage::Persisting,
            SyncError::Cancelled => SyncStage::Failed,
        }
    }
}

impl From<StockError> for SyncError {
    fn from(error: StockError) -> Self {
        SyncError::Setup(error.to_string())
    }
}
