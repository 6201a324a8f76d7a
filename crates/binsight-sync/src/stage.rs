//! The sync run's linear state machine.
//!
//! `Idle → ExportRequested → ExportPolling → Reconstructing → Enriching →
//! Persisting → Done`, with any stage able to exit directly to `Failed`.
//! There is no automatic retry; the caller decides whether to start over
//! from `Idle`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Idle,
    ExportRequested,
    ExportPolling,
    Reconstructing,
    Enriching,
    Persisting,
    Done,
    Failed,
}

impl SyncStage {
    /// Human-readable progress text for display surfaces.
    #[must_use]
    pub fn status_text(self) -> &'static str {
        match self {
            SyncStage::Idle => "waiting to start",
            SyncStage::ExportRequested => "requesting catalog export",
            SyncStage::ExportPolling => "waiting for the export job to complete",
            SyncStage::Reconstructing => "rebuilding the product graph",
            SyncStage::Enriching => "looking up warehouse bins",
            SyncStage::Persisting => "writing products to the store",
            SyncStage::Done => "sync complete",
            SyncStage::Failed => "sync failed",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SyncStage::Done | SyncStage::Failed)
    }
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status_text())
    }
}
