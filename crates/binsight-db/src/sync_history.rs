//! Database operations for the `sync_history` audit trail.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `sync_history` table.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct SyncHistoryRow {
    pub id: i64,
    pub public_id: Uuid,
    pub date: DateTime<Utc>,
}

/// Records a timestamped marker for a completed full sync and returns the
/// new row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn record_sync(pool: &PgPool) -> Result<SyncHistoryRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, SyncHistoryRow>(
        "INSERT INTO sync_history (public_id) \
         VALUES ($1) \
         RETURNING id, public_id, date",
    )
    .bind(public_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the most recent sync marker, if any sync has ever completed.
///
/// Ordered by `date DESC, id DESC` so ties on the timestamp still resolve to
/// the newest row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn latest_sync(pool: &PgPool) -> Result<Option<SyncHistoryRow>, DbError> {
    let row = sqlx::query_as::<_, SyncHistoryRow>(
        "SELECT id, public_id, date \
         FROM sync_history \
         ORDER BY date DESC, id DESC \
         LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
