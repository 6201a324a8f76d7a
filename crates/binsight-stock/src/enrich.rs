//! Bounded-concurrency enrichment of the product graph.
//!
//! One lookup per product against the stock API, at most `concurrency`
//! requests in flight at once. The bound is the primary defense against the
//! provider's rate limits, not a performance knob. Results merge back
//! positionally: the ordered buffered stream guarantees that product *i* in
//! the input is product *i* in the output no matter which requests finish
//! first.

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use binsight_core::Product;

use crate::client::StockClient;
use crate::types::{BinLocations, StockEntry};

/// Enriches every product with warehouse data, best effort per item.
///
/// Products whose first variant has no SKU pass through without a network
/// call. A failed request, a malformed body, or an empty result leaves the
/// product's prior values untouched; one SKU's failure never blocks the
/// rest of the batch, and the output always has the input's length and
/// order. Cancellation makes the remaining items pass through unchanged.
pub async fn enrich_products(
    client: &StockClient,
    products: Vec<Product>,
    concurrency: usize,
    cancel: &CancellationToken,
) -> Vec<Product> {
    let total = products.len();
    let enriched: Vec<Product> = stream::iter(products)
        .map(|product| async move {
            if cancel.is_cancelled() {
                return product;
            }
            enrich_one(client, product).await
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    debug_assert_eq!(enriched.len(), total);
    enriched
}

async fn enrich_one(client: &StockClient, mut product: Product) -> Product {
    let sku = product.first_sku().to_owned();
    if sku.is_empty() {
        return product;
    }

    match client.lookup_by_sku(&sku).await {
        Ok(Some(entry)) => apply_stock_entry(&mut product, &entry),
        Ok(None) => {
            tracing::warn!(sku = %sku, "stock API returned no entry; keeping prior values");
        }
        Err(error) => {
            tracing::warn!(
                sku = %sku,
                error = %error,
                "stock lookup failed; keeping prior values"
            );
        }
    }

    product
}

/// Overwrites the warehouse fields from a lookup result.
///
/// A successful entry replaces `bin_location`, `bin_max_quantity`, and
/// `image_url` wholesale — fields the entry omits become their empty/zero
/// form. `bin_current_quantity` is reset to zero on every successful
/// enrichment: a fresh sync always re-zeroes the physical count pending
/// re-confirmation by staff.
fn apply_stock_entry(product: &mut Product, entry: &StockEntry) {
    product.bin_location = entry
        .bin_locations
        .as_ref()
        .map(BinLocations::joined)
        .unwrap_or_default();
    product.bin_max_quantity = entry.hts_us.unwrap_or(0).max(0);
    product.image_url = entry.image_url.clone().unwrap_or_default();
    product.bin_current_quantity = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BinLocations;
    use binsight_core::Variant;

    fn product(sku: &str) -> Product {
        Product {
            shopify_id: "gid://shopify/Product/1".to_owned(),
            title: "Widget".to_owned(),
            vendor: String::new(),
            product_type: String::new(),
            image_url: "https://cdn.example.com/old.png".to_owned(),
            updated_at: None,
            bin_max_quantity: 4,
            bin_current_quantity: 2,
            bin_location: "Z9".to_owned(),
            variants: vec![Variant {
                variant_id: "gid://shopify/ProductVariant/1".to_owned(),
                title: String::new(),
                sku: sku.to_owned(),
                barcode: String::new(),
                inventory_quantity: 0,
                committed_inventory: 0,
                parent_id: "gid://shopify/Product/1".to_owned(),
            }],
        }
    }

    #[test]
    fn apply_overwrites_warehouse_fields_and_rezeroes_count() {
        let mut p = product("ABC");
        let entry = StockEntry {
            bin_locations: Some(BinLocations::One("A1,A2".to_owned())),
            hts_us: Some(10),
            image_url: Some("u".to_owned()),
            quantity_on_hand: Some(7),
        };

        apply_stock_entry(&mut p, &entry);

        assert_eq!(p.bin_location, "A1,A2");
        assert_eq!(p.bin_max_quantity, 10);
        assert_eq!(p.image_url, "u");
        assert_eq!(p.bin_current_quantity, 0);
    }

    #[test]
    fn apply_clamps_negative_capacity_to_zero() {
        let mut p = product("ABC");
        let entry = StockEntry {
            bin_locations: None,
            hts_us: Some(-5),
            image_url: None,
            quantity_on_hand: None,
        };

        apply_stock_entry(&mut p, &entry);

        assert_eq!(p.bin_max_quantity, 0);
        // A successful entry overwrites the location even when it carries none.
        assert_eq!(p.bin_location, "");
    }

    #[test]
    fn apply_overwrites_image_even_when_entry_carries_none() {
        let mut p = product("ABC");
        let entry = StockEntry {
            bin_locations: None,
            hts_us: Some(3),
            image_url: None,
            quantity_on_hand: None,
        };

        apply_stock_entry(&mut p, &entry);

        assert_eq!(p.image_url, "");
        assert_eq!(p.bin_max_quantity, 3);
    }
}
