use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use binsight_core::Product;
use binsight_db::ProductPage;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProductPageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct BulkUpsertResponse {
    success: bool,
    count: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct BinCountUpdate {
    sku: String,
    bin_current_quantity: i32,
    update_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateResponse {
    success: bool,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductPageQuery>,
) -> Result<Json<ProductPage>, ApiError> {
    let page = binsight_db::list_products(&state.pool, query.page, query.limit)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok(Json(page))
}

/// Replaces the stored catalog with the posted product list via the same
/// batched upsert the sync pipeline uses. Payloads are validated up front
/// (SKU present, bin quantities non-negative) so a bad payload fails before
/// any write instead of surfacing as a storage error mid-batch.
pub(super) async fn replace_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(products): Json<Vec<Product>>,
) -> Result<Json<BulkUpsertResponse>, ApiError> {
    if let Some(bad) = products.iter().find(|p| !p.has_persistable_sku()) {
        return Err(ApiError::new(
            "validation_error",
            format!("product '{}' has no variant SKU to key on", bad.shopify_id),
        ));
    }

    if let Some(bad) = products
        .iter()
        .find(|p| p.bin_current_quantity < 0 || p.bin_max_quantity < 0)
    {
        return Err(ApiError::new(
            "validation_error",
            format!(
                "product '{}' has a negative bin quantity",
                bad.first_sku()
            ),
        ));
    }

    let count = binsight_db::upsert_products(
        &state.pool,
        &products,
        binsight_db::DEFAULT_BATCH_SIZE,
    )
    .await
    .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok(Json(BulkUpsertResponse {
        success: true,
        count,
    }))
}

pub(super) async fn set_bin_count(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(update): Json<BinCountUpdate>,
) -> Result<Json<UpdateResponse>, ApiError> {
    if update.sku.trim().is_empty() {
        return Err(ApiError::new("validation_error", "sku must not be empty"));
    }

    binsight_db::set_bin_count(
        &state.pool,
        &update.sku,
        update.bin_current_quantity,
        update.update_at,
    )
    .await
    .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok(Json(UpdateResponse { success: true }))
}
