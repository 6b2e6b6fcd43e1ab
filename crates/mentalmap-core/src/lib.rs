pub mod app_config;
pub mod config;
pub mod geo;
pub mod proximity;
pub mod zoom;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, ConfigError};
pub use geo::{
    bounding_box, equirectangular_distance_km, haversine_distance_m, BoundingBox, Coordinate,
    GeoError,
};
pub use proximity::{
    filter_within_radius, group_by_region, sort_by_distance, top_n, with_distances, Center,
    RegionGroup, UNSPECIFIED_REGION,
};
pub use zoom::{level_for_radius, radius_for_level, MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL};
