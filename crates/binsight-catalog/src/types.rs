//! Wire types for the Shopify Admin GraphQL bulk-export surface and the
//! line-delimited export stream.
//!
//! ## Export stream shape
//!
//! Each JSONL line is one node. Child nodes carry a `__parentId` field; the
//! platform makes no ordering guarantee between node types, so reconstruction
//! indexes everything in one pass before assembly (see `parse`).
//!
//! Variant lines carry their `inventoryItem.id`; inventory-level lines are
//! parented to that inventory-item id and carry a `quantities` array of named
//! counts, of which only `"committed"` is relevant here.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Status of a platform-side bulk export job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Created,
    Running,
    Canceling,
    Completed,
    Failed,
    Canceled,
    Expired,
}

impl JobStatus {
    /// Terminal states end the poll loop; everything else means "keep waiting".
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Canceled | JobStatus::Expired
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Created => "CREATED",
            JobStatus::Running => "RUNNING",
            JobStatus::Canceling => "CANCELING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Canceled => "CANCELED",
            JobStatus::Expired => "EXPIRED",
        }
    }
}

/// A bulk export job as reported by the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkOperation {
    pub id: String,
    pub status: JobStatus,
    #[serde(rename = "errorCode", default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A field-level validation error returned by `bulkOperationRunQuery`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkOperationRunQueryPayload {
    #[serde(rename = "bulkOperation")]
    pub bulk_operation: Option<BulkOperation>,
    #[serde(rename = "userErrors", default)]
    pub user_errors: Vec<UserError>,
}

// ---------------------------------------------------------------------------
// Export stream records
// ---------------------------------------------------------------------------

/// One line of the export stream, covering all three node kinds. Fields that
/// do not apply to a given kind simply deserialize as absent.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecord {
    pub id: String,
    #[serde(rename = "__parentId", default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(rename = "productType", default)]
    pub product_type: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "featuredImage", default)]
    pub featured_image: Option<FeaturedImage>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(rename = "inventoryQuantity", default)]
    pub inventory_quantity: Option<i32>,
    #[serde(rename = "inventoryItem", default)]
    pub inventory_item: Option<InventoryItemRef>,
    #[serde(default)]
    pub quantities: Vec<NamedQuantity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeaturedImage {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InventoryItemRef {
    pub id: String,
}

/// One entry of an inventory level's `quantities(names: [...])` selection.
#[derive(Debug, Deserialize)]
pub(crate) struct NamedQuantity {
    pub name: String,
    pub quantity: i32,
}
