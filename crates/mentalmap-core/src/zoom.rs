//! Discrete map zoom level ↔ search radius mapping.
//!
//! The map widget reports magnification as an integer level in [1, 13];
//! each level corresponds to an approximate ground radius used to
//! parameterize the next nearby-centers fetch. Radius is strictly
//! increasing in level: level 1 covers a city block, level 13 the whole
//! country.

pub const MIN_ZOOM_LEVEL: u8 = 1;
pub const MAX_ZOOM_LEVEL: u8 = 13;

/// Search radius in meters for levels 1 through 13, in level order.
const RADIUS_BY_LEVEL: [f64; 13] = [
    100.0,
    250.0,
    500.0,
    1_000.0,
    2_500.0,
    5_000.0,
    10_000.0,
    25_000.0,
    50_000.0,
    100_000.0,
    250_000.0,
    500_000.0,
    1_000_000.0,
];

/// Search radius in meters for a zoom level.
///
/// Levels outside [1, 13] return the largest configured radius
/// (1,000,000 m), so an unexpected widget level degrades to the widest
/// search rather than an error.
#[must_use]
pub fn radius_for_level(level: u8) -> f64 {
    if (MIN_ZOOM_LEVEL..=MAX_ZOOM_LEVEL).contains(&level) {
        RADIUS_BY_LEVEL[usize::from(level - 1)]
    } else {
        RADIUS_BY_LEVEL[usize::from(MAX_ZOOM_LEVEL - 1)]
    }
}

/// The largest level whose table radius does not exceed `radius_m`,
/// scanning from level 13 downward.
///
/// Saturates to [`MAX_ZOOM_LEVEL`] both above the table (radius larger
/// than every entry matches level 13 immediately) and below it (no entry
/// fits, so the scan falls through).
#[must_use]
pub fn level_for_radius(radius_m: f64) -> u8 {
    for level in (MIN_ZOOM_LEVEL..=MAX_ZOOM_LEVEL).rev() {
        if radius_m >= RADIUS_BY_LEVEL[usize::from(level - 1)] {
            return level;
        }
    }
    MAX_ZOOM_LEVEL
}
