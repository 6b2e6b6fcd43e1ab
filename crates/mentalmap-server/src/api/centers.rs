use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use mentalmap_core::{
    bounding_box, filter_within_radius, group_by_region, radius_for_level, sort_by_distance,
    with_distances, Center, Coordinate,
};
use mentalmap_db::CenterRow;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CentersQuery {
    lat: f64,
    lng: f64,
    /// Explicit search radius in meters. Wins over `level` when both are set.
    radius: Option<f64>,
    /// Map zoom level in [1, 13], translated through the radius table.
    level: Option<u8>,
    limit: Option<i64>,
}

/// Wire item for `/centers` responses: one field per column of the
/// external contract, with `distance_m` rounded to whole meters.
#[derive(Debug, Serialize)]
pub(super) struct CenterItem {
    pub name: String,
    pub phone: String,
    pub website: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub distance_m: Option<i64>,
}

impl CenterItem {
    #[allow(clippy::cast_possible_truncation)]
    fn from_center(center: Center) -> Self {
        Self {
            name: center.name,
            phone: center.phone,
            website: center.website,
            description: center.description,
            lat: center.lat,
            lng: center.lng,
            region: center.region,
            distance_m: center.distance_m.map(|d| d.round() as i64),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RegionItem {
    pub region: String,
    pub centers: Vec<CenterItem>,
}

fn resolve_radius(radius: Option<f64>, level: Option<u8>, default_radius_m: f64) -> f64 {
    match (radius, level) {
        (Some(radius), _) => radius,
        (None, Some(level)) => radius_for_level(level),
        (None, None) => default_radius_m,
    }
}

/// `GET /api/v1/centers?lat=&lng=&radius=&level=&limit=`
///
/// Returns open centers within the resolved radius of the caller's
/// position, annotated with distance and sorted nearest-first.
pub(super) async fn list_nearby_centers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CentersQuery>,
) -> Result<Json<ApiResponse<Vec<CenterItem>>>, ApiError> {
    let origin = Coordinate::new(query.lat, query.lng)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let radius_m = resolve_radius(query.radius, query.level, state.config.default_radius_m);
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!("radius must be a positive number of meters, got {radius_m}"),
        ));
    }

    let bbox = bounding_box(origin, radius_m);
    let rows = mentalmap_db::list_open_centers_in_bbox(&state.pool, &bbox)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &mentalmap_db::DbError::from(e)))?;

    let centers: Vec<Center> = rows.into_iter().filter_map(CenterRow::into_center).collect();
    let sorted = sort_by_distance(&filter_within_radius(
        &with_distances(&centers, origin),
        radius_m,
    ));

    let limit = usize::try_from(normalize_limit(query.limit)).unwrap_or(usize::MAX);
    let data: Vec<CenterItem> = sorted
        .into_iter()
        .take(limit)
        .map(CenterItem::from_center)
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /api/v1/centers/regions`
///
/// All open, geocoded centers grouped by region label in first-seen order,
/// for the nationwide directory view.
pub(super) async fn list_centers_by_region(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<RegionItem>>>, ApiError> {
    let rows = mentalmap_db::list_open_centers(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &mentalmap_db::DbError::from(e)))?;

    let centers: Vec<Center> = rows.into_iter().filter_map(CenterRow::into_center).collect();
    let data: Vec<RegionItem> = group_by_region(&centers)
        .into_iter()
        .map(|group| RegionItem {
            region: group.region,
            centers: group
                .centers
                .into_iter()
                .map(CenterItem::from_center)
                .collect(),
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
