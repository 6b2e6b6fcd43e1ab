//! `nearby` subcommand: proximity query against the centers database.

use mentalmap_core::{
    bounding_box, filter_within_radius, radius_for_level, sort_by_distance, top_n, with_distances,
    Center, Coordinate,
};
use mentalmap_db::CenterRow;

pub(crate) async fn run(
    lat: f64,
    lng: f64,
    radius: Option<f64>,
    level: Option<u8>,
    top: Option<usize>,
) -> anyhow::Result<()> {
    let config = mentalmap_core::load_app_config()?;
    let pool = mentalmap_db::connect_pool(
        &config.database_url,
        mentalmap_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    let origin = Coordinate::new(lat, lng)?;
    let radius_m = radius
        .or_else(|| level.map(radius_for_level))
        .unwrap_or(config.default_radius_m);
    anyhow::ensure!(
        radius_m.is_finite() && radius_m > 0.0,
        "radius must be a positive number of meters, got {radius_m}"
    );

    let bbox = bounding_box(origin, radius_m);
    let rows = mentalmap_db::list_open_centers_in_bbox(&pool, &bbox).await?;
    let centers: Vec<Center> = rows.into_iter().filter_map(CenterRow::into_center).collect();

    let nearby = filter_within_radius(&with_distances(&centers, origin), radius_m);
    let shown = match top {
        Some(n) => top_n(&nearby, n),
        None => sort_by_distance(&nearby),
    };

    if shown.is_empty() {
        println!("no centers within {}", format_distance(radius_m));
        return Ok(());
    }

    println!("{} centers within {}:", shown.len(), format_distance(radius_m));
    for center in &shown {
        let distance = center
            .distance_m
            .map_or_else(|| "?".to_string(), format_distance);
        if center.phone.is_empty() {
            println!("📍 {} ({distance})", center.name);
        } else {
            println!("📍 {} ({distance}) {}", center.name, center.phone);
        }
    }

    Ok(())
}

/// Meters below 1 km, one-decimal kilometers above; the same rendering the
/// map widget uses for its radius banner.
#[allow(clippy::cast_possible_truncation)]
fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1}km", meters / 1000.0)
    } else {
        format!("{}m", meters.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_distance_uses_meters_below_one_km() {
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(999.4), "999m");
    }

    #[test]
    fn format_distance_uses_kilometers_from_one_km() {
        assert_eq!(format_distance(1000.0), "1.0km");
        assert_eq!(format_distance(10_000.0), "10.0km");
        assert_eq!(format_distance(325_400.0), "325.4km");
    }
}
