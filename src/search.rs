//! Text and proximity search over a directory snapshot.
//!
//! Both entry points are pure reads over the `AttractionSet` handed to them;
//! they never touch storage and never block. Scan order is category priority
//! first, then snapshot insertion order, which makes every result and every
//! tie-break reproducible.

use tracing::debug;

use crate::category::{ActiveCategories, Category};
use crate::domain::{Attraction, AttractionSet, Position};

/// Mean Earth radius in meters, per the haversine convention.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A search result together with the category it was found under.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub attraction: Attraction,
    pub category: Category,
}

/// Resolve a free-text query to the first attraction whose name contains it,
/// case-insensitively. First match wins, scanning categories in priority
/// order and attractions in snapshot order.
///
/// A successful search reveals its result's category: if that category was
/// inactive it is activated here, as an observable side effect. An empty or
/// whitespace-only query is a no-op.
pub fn search_by_text(
    query: &str,
    active: &mut ActiveCategories,
    directory: &AttractionSet,
) -> Option<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for category in Category::priority_order() {
        for attraction in directory.in_category(category) {
            if attraction.name.to_lowercase().contains(&needle) {
                if !active.is_active(category) {
                    debug!("Search for '{}' activated category {}", needle, category);
                    active.activate(category);
                }
                return Some(SearchHit {
                    attraction: attraction.clone(),
                    category,
                });
            }
        }
    }

    None
}

/// Find the attraction nearest to `position` among the active categories.
/// Ties resolve to the first attraction encountered in category priority
/// order, then snapshot order. Returns `None` when no category is active or
/// the active categories hold no attractions.
pub fn nearest_to(
    position: &Position,
    active: &ActiveCategories,
    directory: &AttractionSet,
) -> Option<SearchHit> {
    let mut best: Option<(SearchHit, f64)> = None;

    for category in Category::priority_order() {
        if !active.is_active(category) {
            continue;
        }
        for attraction in directory.in_category(category) {
            let dist = haversine_m(position.lat, position.lng, attraction.lat, attraction.lng);
            // Strict < keeps the earliest of exact ties.
            if best.as_ref().map_or(true, |(_, d)| dist < *d) {
                best = Some((
                    SearchHit {
                        attraction: attraction.clone(),
                        category,
                    },
                    dist,
                ));
            }
        }
    }

    best.map(|(hit, _)| hit)
}

/// All active-category attractions within `radius_m` meters of `position`,
/// nearest first.
pub fn nearby(
    position: &Position,
    radius_m: f64,
    active: &ActiveCategories,
    directory: &AttractionSet,
) -> Vec<SearchHit> {
    let mut hits: Vec<(SearchHit, f64)> = Vec::new();

    for category in Category::priority_order() {
        if !active.is_active(category) {
            continue;
        }
        for attraction in directory.in_category(category) {
            let dist = haversine_m(position.lat, position.lng, attraction.lat, attraction.lng);
            if dist <= radius_m {
                hits.push((
                    SearchHit {
                        attraction: attraction.clone(),
                        category,
                    },
                    dist,
                ));
            }
        }
    }

    hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    hits.into_iter().map(|(hit, _)| hit).collect()
}

/// Great-circle distance in meters between two points given in degrees.
pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn attraction(name: &str, lat: f64, lng: f64, category: Category) -> Attraction {
        Attraction {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            address: String::new(),
            lat,
            lng,
            category,
        }
    }

    fn medan_directory() -> AttractionSet {
        let mut set = AttractionSet::default();
        set.push(attraction("Warung Enak", 3.59, 98.67, Category::Food));
        set.push(attraction("Mie Aceh Titi Bobrok", 3.58, 98.65, Category::Food));
        set.push(attraction("Merdeka Walk", 3.595, 98.678, Category::Fun));
        set.push(attraction("Hotel Danau Toba", 3.582, 98.671, Category::Hotels));
        set
    }

    #[test]
    fn text_search_first_match_wins() {
        let directory = medan_directory();
        let mut active = ActiveCategories::all();

        let hit = search_by_text("enak", &mut active, &directory).unwrap();
        assert_eq!(hit.attraction.name, "Warung Enak");
        assert_eq!(hit.category, Category::Food);
    }

    #[test]
    fn text_search_activates_winning_category() {
        let directory = medan_directory();
        let mut active = ActiveCategories::all();
        active.toggle(Category::Hotels);
        assert!(!active.hotels);

        let hit = search_by_text("DANAU", &mut active, &directory).unwrap();
        assert_eq!(hit.category, Category::Hotels);
        assert!(active.hotels);
    }

    #[test]
    fn text_search_leaves_unrelated_categories_alone() {
        let directory = medan_directory();
        let mut active = ActiveCategories::all();
        active.toggle(Category::Fun);

        let hit = search_by_text("enak", &mut active, &directory).unwrap();
        assert_eq!(hit.category, Category::Food);
        assert!(!active.fun, "fun must stay inactive");
    }

    #[test]
    fn empty_query_is_a_noop() {
        let directory = medan_directory();
        let mut active = ActiveCategories::none();

        assert!(search_by_text("", &mut active, &directory).is_none());
        assert!(search_by_text("   ", &mut active, &directory).is_none());
        assert_eq!(active, ActiveCategories::none());
    }

    #[test]
    fn text_search_miss_returns_none() {
        let directory = medan_directory();
        let mut active = ActiveCategories::all();
        assert!(search_by_text("zanzibar", &mut active, &directory).is_none());
    }

    #[test]
    fn haversine_is_symmetric() {
        let d1 = haversine_m(3.59, 98.67, 3.58, 98.65);
        let d2 = haversine_m(3.58, 98.65, 3.59, 98.67);
        assert!((d1 - d2).abs() < 1e-9);
        assert!(d1 > 0.0);
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        assert_eq!(haversine_m(3.59, 98.67, 3.59, 98.67), 0.0);
    }

    #[test]
    fn nearest_picks_minimum_distance() {
        let directory = medan_directory();
        let active = ActiveCategories::all();
        let position = Position::new(3.5801, 98.6501);

        let hit = nearest_to(&position, &active, &directory).unwrap();
        assert_eq!(hit.attraction.name, "Mie Aceh Titi Bobrok");
    }

    #[test]
    fn nearest_respects_active_filter() {
        let directory = medan_directory();
        let mut active = ActiveCategories::all();
        active.toggle(Category::Food);
        let position = Position::new(3.5801, 98.6501);

        let hit = nearest_to(&position, &active, &directory).unwrap();
        assert_ne!(hit.category, Category::Food);
    }

    #[test]
    fn nearest_over_empty_active_set_is_none() {
        let directory = medan_directory();
        let active = ActiveCategories::none();
        let position = Position::new(3.59, 98.67);

        assert!(nearest_to(&position, &active, &directory).is_none());
    }

    #[test]
    fn nearest_tie_breaks_on_category_priority() {
        let mut directory = AttractionSet::default();
        // Same coordinates in two categories; food has priority.
        directory.push(attraction("Tip Top", 3.585, 98.681, Category::Fun));
        directory.push(attraction("Tip Top Restaurant", 3.585, 98.681, Category::Food));
        let active = ActiveCategories::all();
        let position = Position::new(3.585, 98.681);

        let hit = nearest_to(&position, &active, &directory).unwrap();
        assert_eq!(hit.category, Category::Food);
    }

    #[test]
    fn nearby_filters_by_radius_and_sorts() {
        let directory = medan_directory();
        let active = ActiveCategories::all();
        let position = Position::new(3.59, 98.67);

        let all = nearby(&position, 10_000.0, &active, &directory);
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].attraction.name, "Warung Enak");

        let close = nearby(&position, 500.0, &active, &directory);
        assert!(close.len() < all.len());
        for hit in &close {
            let d = haversine_m(3.59, 98.67, hit.attraction.lat, hit.attraction.lng);
            assert!(d <= 500.0);
        }
    }
}
