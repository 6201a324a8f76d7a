pub mod client;
pub mod error;
pub mod parse;
pub mod types;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use parse::parse_export;
pub use types::{BulkOperation, JobStatus};
