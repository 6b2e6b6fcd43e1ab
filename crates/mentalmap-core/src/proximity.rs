//! Derived proximity views over center snapshots.
//!
//! Every operation here is pure: it takes an input slice, returns new
//! records, and never mutates the caller's data. Given identical inputs
//! the output is identical on every call, which keeps map re-renders
//! deterministic.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::geo::{haversine_distance_m, Coordinate};

/// Region label assigned to centers that carry no administrative region.
pub const UNSPECIFIED_REGION: &str = "기타";

/// A counseling center as served to clients.
///
/// Field-for-field match of the `/centers` wire contract. `distance_m` is
/// derived relative to a reference coordinate at query time; it is absent
/// until [`with_distances`] has run and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Center {
    pub name: String,
    pub phone: String,
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}

/// Centers sharing one region label, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct RegionGroup {
    pub region: String,
    pub centers: Vec<Center>,
}

/// Annotates each center with its Haversine distance from `origin`.
///
/// Input order is preserved; the input itself is untouched.
#[must_use]
pub fn with_distances(centers: &[Center], origin: Coordinate) -> Vec<Center> {
    centers
        .iter()
        .map(|center| {
            let target = Coordinate {
                lat: center.lat,
                lng: center.lng,
            };
            Center {
                distance_m: Some(haversine_distance_m(origin, target)),
                ..center.clone()
            }
        })
        .collect()
}

/// Retains centers whose annotated distance is within `radius_m`.
///
/// Centers never passed through [`with_distances`] have no distance and are
/// excluded; NaN distances fail the `<=` comparison and drop out the same
/// way. Idempotent: re-filtering at the same radius returns the same set.
#[must_use]
pub fn filter_within_radius(centers: &[Center], radius_m: f64) -> Vec<Center> {
    centers
        .iter()
        .filter(|center| center.distance_m.is_some_and(|d| d <= radius_m))
        .cloned()
        .collect()
}

/// Sorts ascending by annotated distance.
///
/// The sort is stable, so centers with equal distances keep their relative
/// input order. Unannotated and NaN distances order after every valid
/// number.
#[must_use]
pub fn sort_by_distance(centers: &[Center]) -> Vec<Center> {
    let mut sorted = centers.to_vec();
    sorted.sort_by(|a, b| compare_distance(a.distance_m, b.distance_m));
    sorted
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match (x.is_nan(), y.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        },
    }
}

/// The `n` nearest centers, ascending by distance.
///
/// Returns the whole (sorted) input when `n` exceeds its length; `n == 0`
/// returns an empty vector.
#[must_use]
pub fn top_n(centers: &[Center], n: usize) -> Vec<Center> {
    let mut sorted = sort_by_distance(centers);
    sorted.truncate(n);
    sorted
}

/// Groups centers by region label.
///
/// Groups appear in first-seen order and members keep input order, so the
/// result is deterministic for a given input. Absent or blank region labels
/// collapse into [`UNSPECIFIED_REGION`].
#[must_use]
pub fn group_by_region(centers: &[Center]) -> Vec<RegionGroup> {
    let mut groups: Vec<RegionGroup> = Vec::new();
    for center in centers {
        let label = center
            .region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
            .unwrap_or(UNSPECIFIED_REGION);
        match groups.iter_mut().find(|group| group.region == label) {
            Some(group) => group.centers.push(center.clone()),
            None => groups.push(RegionGroup {
                region: label.to_string(),
                centers: vec![center.clone()],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(name: &str, lat: f64, lng: f64, region: Option<&str>) -> Center {
        Center {
            name: name.to_string(),
            phone: "02-000-0000".to_string(),
            website: format!("https://example.com/{name}"),
            description: None,
            lat,
            lng,
            region: region.map(ToOwned::to_owned),
            distance_m: None,
        }
    }

    fn annotated(name: &str, distance_m: Option<f64>) -> Center {
        Center {
            distance_m,
            ..center(name, 37.5, 127.0, None)
        }
    }

    fn seoul_city_hall() -> Coordinate {
        Coordinate::new(37.5665, 126.9780).unwrap()
    }

    /// Five centers at increasing distance north of Seoul city hall.
    fn ladder() -> Vec<Center> {
        vec![
            center("c3", 37.5935, 126.9780, None), // ~3km
            center("c1", 37.5755, 126.9780, None), // ~1km
            center("c5", 37.6115, 126.9780, None), // ~5km
            center("c2", 37.5845, 126.9780, None), // ~2km
            center("c4", 37.6025, 126.9780, None), // ~4km
        ]
    }

    #[test]
    fn with_distances_annotates_without_mutating_input() {
        let input = ladder();
        let annotated = with_distances(&input, seoul_city_hall());
        assert!(input.iter().all(|c| c.distance_m.is_none()));
        assert!(annotated.iter().all(|c| c.distance_m.is_some()));
        assert_eq!(annotated.len(), input.len());
        // Input order preserved
        let names: Vec<_> = annotated.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c3", "c1", "c5", "c2", "c4"]);
    }

    #[test]
    fn with_distances_is_deterministic() {
        let input = ladder();
        let first = with_distances(&input, seoul_city_hall());
        let second = with_distances(&input, seoul_city_hall());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.distance_m, b.distance_m);
        }
    }

    #[test]
    fn filter_within_radius_keeps_only_annotated_in_range() {
        let annotated = with_distances(&ladder(), seoul_city_hall());
        let nearby = filter_within_radius(&annotated, 2_500.0);
        let names: Vec<_> = nearby.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c1", "c2"]);
    }

    #[test]
    fn filter_within_radius_excludes_unannotated() {
        let mixed = vec![annotated("a", Some(100.0)), annotated("b", None)];
        let kept = filter_within_radius(&mixed, 1_000.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "a");
    }

    #[test]
    fn filter_within_radius_excludes_nan() {
        let mixed = vec![annotated("a", Some(100.0)), annotated("n", Some(f64::NAN))];
        let kept = filter_within_radius(&mixed, 1_000.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "a");
    }

    #[test]
    fn filter_within_radius_is_idempotent() {
        let annotated = with_distances(&ladder(), seoul_city_hall());
        let once = filter_within_radius(&annotated, 3_500.0);
        let twice = filter_within_radius(&once, 3_500.0);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.name, b.name);
        }
    }

    #[test]
    fn sort_by_distance_is_ascending() {
        let annotated = with_distances(&ladder(), seoul_city_hall());
        let sorted = sort_by_distance(&annotated);
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c1", "c2", "c3", "c4", "c5"]);
    }

    #[test]
    fn sort_by_distance_is_stable_on_ties() {
        let tied = vec![
            annotated("first", Some(500.0)),
            annotated("second", Some(500.0)),
            annotated("third", Some(100.0)),
        ];
        let sorted = sort_by_distance(&tied);
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["third", "first", "second"]);
    }

    #[test]
    fn sort_by_distance_orders_nan_and_unannotated_last() {
        let mixed = vec![
            annotated("nan", Some(f64::NAN)),
            annotated("none", None),
            annotated("far", Some(9_000.0)),
            annotated("near", Some(10.0)),
        ];
        let sorted = sort_by_distance(&mixed);
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(&names[..2], &["near", "far"]);
        // NaN and None both sort after valid numbers, relative order kept
        assert_eq!(&names[2..], &["nan", "none"]);
    }

    #[test]
    fn top_n_returns_n_nearest_sorted() {
        let annotated = with_distances(&ladder(), seoul_city_hall());
        let top = top_n(&annotated, 3);
        let names: Vec<_> = top.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn top_n_with_large_n_returns_all_sorted() {
        let annotated = with_distances(&ladder(), seoul_city_hall());
        let top = top_n(&annotated, 10);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].name, "c1");
    }

    #[test]
    fn top_n_zero_is_empty() {
        let annotated = with_distances(&ladder(), seoul_city_hall());
        assert!(top_n(&annotated, 0).is_empty());
    }

    #[test]
    fn group_by_region_preserves_first_seen_order() {
        let centers = vec![
            center("a", 37.5, 127.0, Some("서울")),
            center("b", 35.2, 129.1, Some("부산")),
            center("c", 36.4, 127.4, None),
            center("d", 37.6, 127.1, Some("서울")),
        ];
        let groups = group_by_region(&centers);
        let labels: Vec<_> = groups.iter().map(|g| g.region.as_str()).collect();
        assert_eq!(labels, vec!["서울", "부산", UNSPECIFIED_REGION]);

        let seoul_names: Vec<_> = groups[0].centers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(seoul_names, vec!["a", "d"]);
    }

    #[test]
    fn group_by_region_treats_blank_as_unspecified() {
        let centers = vec![
            center("a", 37.5, 127.0, Some("  ")),
            center("b", 37.5, 127.0, Some("")),
        ];
        let groups = group_by_region(&centers);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].region, UNSPECIFIED_REGION);
        assert_eq!(groups[0].centers.len(), 2);
    }

    #[test]
    fn operations_degrade_to_empty_on_empty_input() {
        let empty: Vec<Center> = Vec::new();
        assert!(with_distances(&empty, seoul_city_hall()).is_empty());
        assert!(filter_within_radius(&empty, 1_000.0).is_empty());
        assert!(sort_by_distance(&empty).is_empty());
        assert!(top_n(&empty, 3).is_empty());
        assert!(group_by_region(&empty).is_empty());
    }

    #[test]
    fn center_serializes_to_wire_shape() {
        let mut c = center("허그맘 강남점", 37.4979, 127.0276, Some("서울"));
        c.distance_m = Some(1234.5);
        let json = serde_json::to_value(&c).expect("serialize");
        assert_eq!(json["name"], "허그맘 강남점");
        assert_eq!(json["region"], "서울");
        assert!(json["distance_m"].as_f64().is_some());
        assert!(json.get("description").is_none());
    }
}
