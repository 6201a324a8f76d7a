pub mod client;
pub mod enrich;
pub mod error;
pub mod types;

pub use client::StockClient;
pub use enrich::enrich_products;
pub use error::StockError;
pub use types::{StockEntry, StockLookupResponse};
