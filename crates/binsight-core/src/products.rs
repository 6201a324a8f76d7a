use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product enriched with physical-warehouse fields.
///
/// Rebuilt from scratch on every sync run; continuity across runs is
/// established only by the persistence layer's upsert-by-SKU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Shopify product GID, e.g. `gid://shopify/Product/123`.
    pub shopify_id: String,
    pub title: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub image_url: String,
    /// Last platform-side update. `None` when the export omitted the field.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Capacity of the product's warehouse bin(s). Zero until enrichment or
    /// a manual edit sets it; never negative.
    #[serde(default)]
    pub bin_max_quantity: i32,
    /// Physically counted units in the bin(s). Reset to zero by every
    /// enrichment pass pending re-confirmation by staff; never negative.
    #[serde(default)]
    pub bin_current_quantity: i32,
    /// Comma-joined free-text bin location tags, e.g. `"A1, A2"`.
    #[serde(default)]
    pub bin_location: String,
    /// Variants in first-seen export order. Never empty: products with no
    /// variants in the source carry one synthetic placeholder variant.
    pub variants: Vec<Variant>,
}

/// A purchasable variant of a [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Shopify variant GID, e.g. `gid://shopify/ProductVariant/456`.
    pub variant_id: String,
    #[serde(default)]
    pub title: String,
    /// Empty string when the variant has no SKU assigned yet; such variants
    /// are treated as "not orderable" and excluded from bulk persistence.
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub barcode: String,
    /// Platform-reported on-hand quantity.
    #[serde(default)]
    pub inventory_quantity: i32,
    /// Units already allocated to unfulfilled orders, aggregated from the
    /// export's inventory-level records.
    #[serde(default)]
    pub committed_inventory: i32,
    /// GID of the owning product.
    pub parent_id: String,
}

impl Product {
    /// Returns the SKU of the first variant — the natural persistence key.
    ///
    /// Empty string when the first variant carries no SKU.
    #[must_use]
    pub fn first_sku(&self) -> &str {
        self.variants.first().map_or("", |v| v.sku.as_str())
    }

    /// Returns `true` if this product can participate in bulk persistence,
    /// i.e. its natural key is non-empty.
    #[must_use]
    pub fn has_persistable_sku(&self) -> bool {
        !self.first_sku().is_empty()
    }
}

impl Variant {
    /// Synthetic empty-SKU placeholder attached to products that export with
    /// zero variants, so consumers can always read `variants[0]`.
    #[must_use]
    pub fn placeholder(parent_id: &str) -> Self {
        Self {
            variant_id: String::new(),
            title: String::new(),
            sku: String::new(),
            barcode: String::new(),
            inventory_quantity: 0,
            committed_inventory: 0,
            parent_id: parent_id.to_owned(),
        }
    }
}
