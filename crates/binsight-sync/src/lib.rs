pub mod error;
pub mod pipeline;
pub mod stage;

pub use error::SyncError;
pub use pipeline::{SyncOptions, SyncOutcome, SyncPipeline};
pub use stage::SyncStage;
