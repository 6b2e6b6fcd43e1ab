//! Read operations for the `centers` table.

use mentalmap_core::BoundingBox;
use sqlx::PgPool;

use super::types::CenterRow;

/// Query open, coordinate-complete centers inside a bounding box.
///
/// The box is a prefilter: callers still apply the exact Haversine radius
/// check over the result. Ordered by `id` so downstream grouping and
/// tie-breaking are deterministic.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_open_centers_in_bbox(
    pool: &PgPool,
    bbox: &BoundingBox,
) -> Result<Vec<CenterRow>, sqlx::Error> {
    sqlx::query_as::<_, CenterRow>(
        "SELECT id, public_id, center_key, name, phone, website, address, \
                description, lat, lng, region, is_open, created_at, updated_at \
         FROM centers \
         WHERE is_open = TRUE \
           AND lat IS NOT NULL AND lng IS NOT NULL \
           AND lat BETWEEN $1 AND $2 \
           AND lng BETWEEN $3 AND $4 \
         ORDER BY id",
    )
    .bind(bbox.min_lat)
    .bind(bbox.max_lat)
    .bind(bbox.min_lng)
    .bind(bbox.max_lng)
    .fetch_all(pool)
    .await
}

/// Query all open centers, with or without coordinates.
///
/// Used by the nationwide region directory. Ordered by `id`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_open_centers(pool: &PgPool) -> Result<Vec<CenterRow>, sqlx::Error> {
    sqlx::query_as::<_, CenterRow>(
        "SELECT id, public_id, center_key, name, phone, website, address, \
                description, lat, lng, region, is_open, created_at, updated_at \
         FROM centers \
         WHERE is_open = TRUE \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

/// Query open centers that have an address but no coordinates yet.
///
/// Feeds the geocode backfill; `limit` bounds the batch size per run.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_centers_missing_coordinates(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<CenterRow>, sqlx::Error> {
    sqlx::query_as::<_, CenterRow>(
        "SELECT id, public_id, center_key, name, phone, website, address, \
                description, lat, lng, region, is_open, created_at, updated_at \
         FROM centers \
         WHERE is_open = TRUE \
           AND (lat IS NULL OR lng IS NULL) \
           AND address IS NOT NULL \
         ORDER BY id \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
