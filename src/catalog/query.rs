//! The catalog query: filter, then stable sort.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::filter::FilterConfig;
use crate::listing::Listing;

/// Result of a catalog query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    /// Matching listings in display order.
    pub listings: Vec<Listing>,

    /// Number of matching listings.
    pub total: usize,

    /// Number of axes constraining the result, for the filter badge.
    pub active_filters: usize,
}

impl CatalogView {
    /// Returns true if no listing matched.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Filters and orders `listings` according to `config`.
///
/// The input slice is left untouched; matching listings are cloned into a
/// new vector. The sort is stable, so listings that tie on the sort key keep
/// their relative input order.
///
/// # Example
///
/// ```rust
/// use swapshelf::{filter_sort, FilterConfig};
///
/// let sorted = filter_sort(&[], &FilterConfig::default());
/// assert!(sorted.is_empty());
/// ```
pub fn filter_sort(listings: &[Listing], config: &FilterConfig) -> Vec<Listing> {
    let needle = config.search_needle();
    let mut matched: Vec<Listing> = listings
        .iter()
        .filter(|listing| config.matches_with_needle(listing, needle.as_deref()))
        .cloned()
        .collect();

    let key = config.sort_key;
    matched.sort_by(|a, b| key.compare(a, b));
    matched
}

/// Runs [`filter_sort`] and derives the result and active-filter counts.
pub fn browse(listings: &[Listing], config: &FilterConfig) -> CatalogView {
    let listings_out = filter_sort(listings, config);
    let view = CatalogView {
        total: listings_out.len(),
        active_filters: config.active_filter_count(),
        listings: listings_out,
    };

    debug!(
        input = listings.len(),
        total = view.total,
        active_filters = view.active_filters,
        sort = %config.sort_key,
        "Catalog query"
    );
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::filter::Facet;
    use crate::catalog::sort::SortKey;
    use crate::listing::{Condition, NewListing};
    use crate::types::{Timestamp, UserId};

    fn listing(title: &str, points: u32, created_ms: i64) -> Listing {
        let mut listing = Listing::from_new(NewListing {
            title: title.into(),
            category: Some("Tops".into()),
            size: "M".into(),
            condition: Condition::Good,
            points,
            owner_id: UserId::new("u"),
            ..Default::default()
        });
        listing.created_at = Timestamp::from_millis(created_ms);
        listing
    }

    fn points(listings: &[Listing]) -> Vec<u32> {
        listings.iter().map(|l| l.points).collect()
    }

    #[test]
    fn test_points_low_example() {
        let input = vec![
            listing("a", 45, 1),
            listing("b", 60, 2),
            listing("c", 35, 3),
        ];
        let config = FilterConfig {
            sort_key: SortKey::PointsLow,
            ..Default::default()
        };
        assert_eq!(points(&filter_sort(&input, &config)), vec![35, 45, 60]);
    }

    #[test]
    fn test_default_is_newest_first() {
        let input = vec![
            listing("old", 1, 1_000),
            listing("new", 2, 3_000),
            listing("mid", 3, 2_000),
        ];
        let view = browse(&input, &FilterConfig::default());
        let titles: Vec<&str> = view.listings.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);
        assert_eq!(view.total, 3);
        assert_eq!(view.active_filters, 0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = vec![
            listing("first", 50, 1),
            listing("cheap", 10, 2),
            listing("second", 50, 3),
            listing("third", 50, 4),
        ];
        let config = FilterConfig {
            sort_key: SortKey::PointsHigh,
            ..Default::default()
        };
        let titles: Vec<String> = filter_sort(&input, &config)
            .into_iter()
            .map(|l| l.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third", "cheap"]);
    }

    #[test]
    fn test_input_not_mutated() {
        let input = vec![listing("a", 1, 1), listing("b", 2, 2)];
        let snapshot = input.clone();
        let config = FilterConfig {
            sort_key: SortKey::PointsHigh,
            ..Default::default()
        };
        let _ = filter_sort(&input, &config);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_empty_result_counts() {
        let input = vec![listing("a", 10, 1)];
        let config = FilterConfig {
            category: Facet::from("Shoes"),
            min_points: Some(5),
            ..Default::default()
        };
        let view = browse(&input, &config);
        assert!(view.is_empty());
        assert_eq!(view.total, 0);
        assert_eq!(view.active_filters, 2);
    }

    #[test]
    fn test_unavailable_listings_still_shown() {
        let mut taken = listing("taken", 10, 1);
        taken.is_available = false;
        let view = browse(&[taken], &FilterConfig::default());
        assert_eq!(view.total, 1);
        assert!(!view.listings[0].is_available);
    }
}
