//! Database operations for the `products` table: the batched bulk upsert,
//! the paginated read, and the single-field count confirmation.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use sqlx::PgPool;

use binsight_core::Product;

use crate::DbError;

/// Rows written per persistence batch. Batches run sequentially; writes
/// within a batch run concurrently, bounding peak load on the datastore.
pub const DEFAULT_BATCH_SIZE: usize = 25;

pub const DEFAULT_PAGE_SIZE: i64 = 200;
pub const MAX_PAGE_SIZE: i64 = 500;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `products` table. `variants` is the serialized variant
/// list, stored as an opaque JSONB blob and decoded by consumers that need
/// per-variant detail.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ProductRow {
    pub sku: String,
    pub shopify_id: String,
    pub title: String,
    pub image_url: String,
    pub vendor: String,
    pub product_type: String,
    pub update_at: Option<DateTime<Utc>>,
    pub inventory_quantity: i32,
    pub bin_max_quantity: i32,
    pub bin_current_quantity: i32,
    pub bin_location: String,
    pub variants: serde_json::Value,
}

/// One page of the paginated product read.
#[derive(Debug, serde::Serialize)]
pub struct ProductPage {
    pub products: Vec<ProductRow>,
    pub total: i64,
    pub page: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

// ---------------------------------------------------------------------------
// Bulk upsert
// ---------------------------------------------------------------------------

/// Upserts the enriched product list in fixed-size batches.
///
/// Batches are written sequentially; within a batch all rows write
/// concurrently. Any batch failure aborts the call with the underlying
/// storage error — earlier batches stay committed and callers are expected
/// to re-run the full sync.
///
/// The upsert key is the SKU of each product's first variant. On conflict
/// every mutable column is overwritten with the incoming value (full
/// replace, no per-field merge). Callers should filter out empty-SKU
/// products beforehand to avoid collisions on the empty-string key.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any write fails, or
/// [`DbError::VariantSerialization`] if a variant list cannot be encoded.
pub async fn upsert_products(
    pool: &PgPool,
    products: &[Product],
    batch_size: usize,
) -> Result<u64, DbError> {
    let batch_size = batch_size.max(1);
    let mut written: u64 = 0;

    for batch in products.chunks(batch_size) {
        try_join_all(batch.iter().map(|product| upsert_product(pool, product))).await?;
        written += batch.len() as u64;
    }

    Ok(written)
}

async fn upsert_product(pool: &PgPool, product: &Product) -> Result<(), DbError> {
    let sku = product.first_sku();
    let inventory_quantity = product
        .variants
        .first()
        .map_or(0, |v| v.inventory_quantity);
    let variants = serde_json::to_value(&product.variants)?;

    sqlx::query(
        "INSERT INTO products \
             (sku, shopify_id, title, image_url, vendor, product_type, update_at, \
              inventory_quantity, bin_max_quantity, bin_current_quantity, bin_location, variants) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         ON CONFLICT (sku) DO UPDATE SET \
             shopify_id           = EXCLUDED.shopify_id, \
             title                = EXCLUDED.title, \
             image_url            = EXCLUDED.image_url, \
             vendor               = EXCLUDED.vendor, \
             product_type         = EXCLUDED.product_type, \
             update_at            = EXCLUDED.update_at, \
             inventory_quantity   = EXCLUDED.inventory_quantity, \
             bin_max_quantity     = EXCLUDED.bin_max_quantity, \
             bin_current_quantity = EXCLUDED.bin_current_quantity, \
             bin_location         = EXCLUDED.bin_location, \
             variants             = EXCLUDED.variants",
    )
    .bind(sku)
    .bind(&product.shopify_id)
    .bind(&product.title)
    .bind(&product.image_url)
    .bind(&product.vendor)
    .bind(&product.product_type)
    .bind(product.updated_at)
    .bind(inventory_quantity)
    .bind(product.bin_max_quantity)
    .bind(product.bin_current_quantity)
    .bind(&product.bin_location)
    .bind(variants)
    .execute(pool)
    .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Paginated read
// ---------------------------------------------------------------------------

/// Clamps caller-supplied pagination to `page >= 1` and
/// `1 <= limit <= MAX_PAGE_SIZE`, defaulting the limit to
/// [`DEFAULT_PAGE_SIZE`].
#[must_use]
pub fn normalize_page_params(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

/// Integer ceiling of `total / limit`; zero rows means zero pages.
#[must_use]
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

/// Returns one page of products ordered by SKU, with the total row count for
/// pagination.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn list_products(
    pool: &PgPool,
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<ProductPage, DbError> {
    let (page, limit) = normalize_page_params(page, limit);
    let offset = (page - 1) * limit;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;

    let products = sqlx::query_as::<_, ProductRow>(
        "SELECT sku, shopify_id, title, image_url, vendor, product_type, update_at, \
                inventory_quantity, bin_max_quantity, bin_current_quantity, bin_location, variants \
         FROM products \
         ORDER BY sku \
         LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(ProductPage {
        products,
        total,
        page,
        total_pages: total_pages(total, limit),
    })
}

// ---------------------------------------------------------------------------
// Point update
// ---------------------------------------------------------------------------

/// Rewrites only `bin_current_quantity` and `update_at` for the matching SKU
/// — the manual "confirm physical count" action, independent of the bulk
/// sync path.
///
/// # Errors
///
/// - [`DbError::NegativeQuantity`] — the contract forbids negative counts.
/// - [`DbError::NotFound`] — no row with that SKU.
/// - [`DbError::Sqlx`] — the update failed.
pub async fn set_bin_count(
    pool: &PgPool,
    sku: &str,
    bin_current_quantity: i32,
    update_at: DateTime<Utc>,
) -> Result<(), DbError> {
    if bin_current_quantity < 0 {
        return Err(DbError::NegativeQuantity {
            sku: sku.to_owned(),
            value: bin_current_quantity,
        });
    }

    let result = sqlx::query(
        "UPDATE products \
         SET bin_current_quantity = $1, update_at = $2 \
         WHERE sku = $3",
    )
    .bind(bin_current_quantity)
    .bind(update_at)
    .bind(sku)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_default_and_clamp() {
        assert_eq!(normalize_page_params(None, None), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(normalize_page_params(Some(0), Some(0)), (1, 1));
        assert_eq!(normalize_page_params(Some(-3), Some(10_000)), (1, MAX_PAGE_SIZE));
        assert_eq!(normalize_page_params(Some(4), Some(50)), (4, 50));
    }

    #[test]
    fn total_pages_is_a_ceiling_division() {
        assert_eq!(total_pages(0, 25), 0);
        assert_eq!(total_pages(1, 25), 1);
        assert_eq!(total_pages(25, 25), 1);
        assert_eq!(total_pages(26, 25), 2);
        assert_eq!(total_pages(30, 25), 2);
    }

    #[test]
    fn batch_count_matches_the_chunked_write_plan() {
        // 30 products with batch size 25 issue two batches: 25 then 5.
        let sizes: Vec<usize> = (0..30)
            .collect::<Vec<_>>()
            .chunks(DEFAULT_BATCH_SIZE)
            .map(<[i32]>::len)
            .collect();
        assert_eq!(sizes, vec![25, 5]);
    }
}
