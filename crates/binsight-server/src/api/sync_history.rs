use axum::{extract::State, http::StatusCode, Extension, Json};

use binsight_db::SyncHistoryRow;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

/// Returns the most recent sync marker, or JSON `null` when no sync has
/// ever completed.
pub(super) async fn latest_sync(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Option<SyncHistoryRow>>, ApiError> {
    let row = binsight_db::latest_sync(&state.pool)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok(Json(row))
}

pub(super) async fn record_sync(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<(StatusCode, Json<SyncHistoryRow>), ApiError> {
    let row = binsight_db::record_sync(&state.pool)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok((StatusCode::CREATED, Json(row)))
}
