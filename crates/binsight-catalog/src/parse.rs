//! Reconstruction of the nested product graph from the flat export stream.
//!
//! The stream arrives as newline-delimited JSON with parent references and no
//! ordering guarantee between node types, so everything is indexed in one
//! linear pass (products into an arena keyed by id, variants into a pending
//! list, committed quantities into an aggregate map) and assembled afterwards.

use std::collections::HashMap;

use binsight_core::{Product, Variant};

use crate::error::CatalogError;
use crate::types::RawRecord;

const VARIANT_ID_MARKER: &str = "ProductVariant";
const INVENTORY_LEVEL_ID_MARKER: &str = "InventoryLevel";

/// A variant record held until all product records have been indexed.
struct PendingVariant {
    variant: Variant,
    inventory_item_id: Option<String>,
}

enum RecordKind {
    Product,
    Variant,
    InventoryLevel,
    Other,
}

/// Classification is evaluated in order: parentless records are products,
/// then the id substring decides between variant and inventory level.
fn classify(record: &RawRecord) -> RecordKind {
    if record.parent_id.is_none() {
        RecordKind::Product
    } else if record.id.contains(VARIANT_ID_MARKER) {
        RecordKind::Variant
    } else if record.id.contains(INVENTORY_LEVEL_ID_MARKER) {
        RecordKind::InventoryLevel
    } else {
        RecordKind::Other
    }
}

/// Parses a line-delimited export stream into the nested product graph.
///
/// Ordering follows first-seen order in the stream, for products and for
/// variants within a product. Variants whose parent product never appears are
/// dropped with a warning; products with zero variants materialize one
/// synthetic empty-SKU placeholder so `variants[0]` always exists.
///
/// # Errors
///
/// Returns [`CatalogError::MalformedRecord`] if any line fails to decode as a
/// JSON object — the format guarantees one well-formed object per line, so
/// partial recovery is not attempted.
pub fn parse_export(stream: &str) -> Result<Vec<Product>, CatalogError> {
    let mut products: Vec<Product> = Vec::new();
    let mut product_index: HashMap<String, usize> = HashMap::new();
    let mut pending_variants: Vec<PendingVariant> = Vec::new();
    // Inventory-item id -> summed committed quantity.
    let mut committed: HashMap<String, i32> = HashMap::new();

    for (line_idx, line) in stream.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let record: RawRecord =
            serde_json::from_str(line).map_err(|e| CatalogError::MalformedRecord {
                line: line_idx + 1,
                source: e,
            })?;

        match classify(&record) {
            RecordKind::Product => {
                let product = Product {
                    shopify_id: record.id.clone(),
                    title: record.title.unwrap_or_default(),
                    vendor: record.vendor.unwrap_or_default(),
                    product_type: record.product_type.unwrap_or_default(),
                    image_url: record
                        .featured_image
                        .and_then(|image| image.url)
                        .unwrap_or_default(),
                    updated_at: record.updated_at,
                    bin_max_quantity: 0,
                    bin_current_quantity: 0,
                    bin_location: String::new(),
                    variants: Vec::new(),
                };
                product_index.insert(record.id, products.len());
                products.push(product);
            }
            RecordKind::Variant => {
                // parent_id is Some by classification; empty string never
                // matches a product id and the variant gets dropped below.
                let parent_id = record.parent_id.unwrap_or_default();
                pending_variants.push(PendingVariant {
                    variant: Variant {
                        variant_id: record.id,
                        title: record.title.unwrap_or_default(),
                        sku: record.sku.unwrap_or_default(),
                        barcode: record.barcode.unwrap_or_default(),
                        inventory_quantity: record.inventory_quantity.unwrap_or(0),
                        committed_inventory: 0,
                        parent_id,
                    },
                    inventory_item_id: record.inventory_item.map(|item| item.id),
                });
            }
            RecordKind::InventoryLevel => {
                let Some(inventory_item_id) = record.parent_id else {
                    continue;
                };
                // Only the "committed" named quantity participates; other
                // named quantities on the same record are ignored.
                let committed_on_record: i32 = record
                    .quantities
                    .iter()
                    .filter(|q| q.name == "committed")
                    .map(|q| q.quantity)
                    .sum();
                committed
                    .entry(inventory_item_id)
                    .and_modify(|total| *total = total.saturating_add(committed_on_record))
                    .or_insert(committed_on_record);
            }
            RecordKind::Other => {
                tracing::warn!(id = %record.id, "skipping unrecognized export record");
            }
        }
    }

    let mut dropped_variants = 0usize;
    for pending in pending_variants {
        let PendingVariant {
            mut variant,
            inventory_item_id,
        } = pending;

        let Some(&idx) = product_index.get(&variant.parent_id) else {
            tracing::warn!(
                variant_id = %variant.variant_id,
                parent_id = %variant.parent_id,
                "dropping variant with no matching product record"
            );
            dropped_variants += 1;
            continue;
        };

        // A variant may legitimately have no inventory level yet.
        variant.committed_inventory = inventory_item_id
            .as_deref()
            .and_then(|id| committed.get(id))
            .copied()
            .unwrap_or(0);

        products[idx].variants.push(variant);
    }

    for product in &mut products {
        if product.variants.is_empty() {
            product
                .variants
                .push(Variant::placeholder(&product.shopify_id));
        }
    }

    tracing::info!(
        products = products.len(),
        dropped_variants,
        "export stream reconstructed"
    );

    Ok(products)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
