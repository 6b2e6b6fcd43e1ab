//! Write operations for the `centers` table.

use mentalmap_core::Coordinate;
use sqlx::{PgExecutor, PgPool};

use super::types::NewCenter;
use crate::DbError;

/// Insert or update a center keyed on `center_key`.
///
/// Re-imports frequently arrive without coordinates; COALESCE keeps a
/// previously geocoded lat/lng (and region) instead of erasing it.
/// Takes any executor so batch imports can run inside one transaction.
/// Returns the row id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_center<'e, E>(executor: E, center: &NewCenter) -> Result<i64, DbError>
where
    E: PgExecutor<'e>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO centers \
             (center_key, name, phone, website, address, description, lat, lng, region) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (center_key) DO UPDATE SET \
             name = EXCLUDED.name, \
             phone = EXCLUDED.phone, \
             website = EXCLUDED.website, \
             address = EXCLUDED.address, \
             description = EXCLUDED.description, \
             lat = COALESCE(EXCLUDED.lat, centers.lat), \
             lng = COALESCE(EXCLUDED.lng, centers.lng), \
             region = COALESCE(EXCLUDED.region, centers.region), \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(&center.center_key)
    .bind(&center.name)
    .bind(&center.phone)
    .bind(&center.website)
    .bind(&center.address)
    .bind(&center.description)
    .bind(center.lat)
    .bind(center.lng)
    .bind(&center.region)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Store geocoded coordinates for a center.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has the given id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn set_center_coordinates(
    pool: &PgPool,
    id: i64,
    coordinate: Coordinate,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE centers \
         SET lat = $2, lng = $3, updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(coordinate.lat)
    .bind(coordinate.lng)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
