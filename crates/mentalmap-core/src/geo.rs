//! Geospatial primitives: validated coordinates and great-circle distance.
//!
//! Distances are computed on a sphere with the mean Earth radius; the
//! equirectangular variant trades accuracy for speed and is never used
//! where the result feeds a radius filter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in meters, shared by both distance formulas.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const KM_PER_LAT_DEGREE: f64 = 111.0;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("coordinate out of range: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

/// A WGS-84 point.
///
/// Construct through [`Coordinate::new`] at system boundaries so that
/// out-of-range (or NaN) latitude/longitude is rejected before it can
/// propagate through distance arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Validates `lat` ∈ [-90, 90] and `lng` ∈ [-180, 180].
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidCoordinate`] for out-of-range or NaN input.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoError::InvalidCoordinate { lat, lng });
        }
        Ok(Self { lat, lng })
    }
}

/// Great-circle distance between two points in meters (Haversine formula).
///
/// Symmetric, non-negative, and zero only when both points coincide (up to
/// floating-point epsilon).
#[must_use]
pub fn haversine_distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Flat-projection distance approximation in kilometers.
///
/// Cheaper than [`haversine_distance_m`] but degrades over long spans and
/// near the poles. Display-only; radius filtering always uses Haversine.
#[must_use]
pub fn equirectangular_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let mean_lat = ((a.lat + b.lat) / 2.0).to_radians();
    let x = (b.lng - a.lng).to_radians() * mean_lat.cos();
    let y = (b.lat - a.lat).to_radians();
    (x * x + y * y).sqrt() * EARTH_RADIUS_M / 1000.0
}

/// A latitude/longitude rectangle used to prefilter candidates in SQL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// Degree-delta box spanning `radius_m` in each direction around `center`.
///
/// Over-approximates: everything inside the radius is inside the box, so
/// callers still apply the exact Haversine check afterwards. The longitude
/// delta widens with latitude and is clamped to a full hemisphere near the
/// poles.
#[must_use]
pub fn bounding_box(center: Coordinate, radius_m: f64) -> BoundingBox {
    let radius_km = radius_m / 1000.0;
    let lat_delta = radius_km / KM_PER_LAT_DEGREE;
    let lng_delta = (radius_km / (KM_PER_LAT_DEGREE * center.lat.to_radians().cos().abs()))
        .min(180.0);

    BoundingBox {
        min_lat: center.lat - lat_delta,
        max_lat: center.lat + lat_delta,
        min_lng: center.lng - lng_delta,
        max_lng: center.lng + lng_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seoul() -> Coordinate {
        Coordinate::new(37.5665, 126.9780).unwrap()
    }

    fn busan() -> Coordinate {
        Coordinate::new(35.1796, 129.0756).unwrap()
    }

    #[test]
    fn coordinate_new_accepts_valid_range() {
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn coordinate_new_rejects_out_of_range() {
        assert!(matches!(
            Coordinate::new(90.01, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            Coordinate::new(0.0, -180.5),
            Err(GeoError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn coordinate_new_rejects_nan() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let d = haversine_distance_m(seoul(), seoul());
        assert!(d.abs() < 1e-6, "expected ~0, got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_distance_m(seoul(), busan());
        let ba = haversine_distance_m(busan(), seoul());
        assert!((ab - ba).abs() < 1e-6, "asymmetry: {ab} vs {ba}");
    }

    #[test]
    fn seoul_busan_is_about_325_km() {
        let d = haversine_distance_m(seoul(), busan());
        assert!(
            (d - 325_000.0).abs() < 5_000.0,
            "Seoul-Busan should be ~325km, got {}km",
            d / 1000.0
        );
    }

    #[test]
    fn equirectangular_tracks_haversine_at_city_scale() {
        let a = seoul();
        let b = Coordinate::new(37.4979, 127.0276).unwrap(); // Gangnam station
        let exact_km = haversine_distance_m(a, b) / 1000.0;
        let approx_km = equirectangular_distance_km(a, b);
        assert!(
            (exact_km - approx_km).abs() < 0.05,
            "approximation drifted: {exact_km}km vs {approx_km}km"
        );
    }

    #[test]
    fn bounding_box_contains_points_within_radius() {
        let origin = seoul();
        let bbox = bounding_box(origin, 10_000.0);
        // ~5km north of origin must be inside the 10km box
        let nearby = Coordinate::new(37.6115, 126.9780).unwrap();
        assert!(haversine_distance_m(origin, nearby) < 10_000.0);
        assert!(nearby.lat >= bbox.min_lat && nearby.lat <= bbox.max_lat);
        assert!(nearby.lng >= bbox.min_lng && nearby.lng <= bbox.max_lng);
    }

    #[test]
    fn bounding_box_lng_span_widens_with_latitude() {
        let equator = bounding_box(Coordinate::new(0.0, 0.0).unwrap(), 10_000.0);
        let north = bounding_box(Coordinate::new(60.0, 0.0).unwrap(), 10_000.0);
        let span = |b: &BoundingBox| b.max_lng - b.min_lng;
        assert!(span(&north) > span(&equator));
    }

    #[test]
    fn bounding_box_clamps_near_poles() {
        let polar = bounding_box(Coordinate::new(90.0, 0.0).unwrap(), 10_000.0);
        assert!(polar.max_lng - polar.min_lng <= 360.0);
        assert!(polar.min_lng.is_finite() && polar.max_lng.is_finite());
    }
}
