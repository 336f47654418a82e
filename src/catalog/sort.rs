//! Result ordering for catalog queries.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::listing::Listing;

/// Ordering applied to the filtered catalog.
///
/// Parsing never fails: an unrecognized key falls back to
/// [`SortKey::Newest`].
///
/// ```rust
/// use swapshelf::SortKey;
///
/// assert_eq!("points-low".parse::<SortKey>().unwrap(), SortKey::PointsLow);
/// assert_eq!("cheapest".parse::<SortKey>().unwrap(), SortKey::Newest);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortKey {
    /// `created_at` descending.
    #[default]
    Newest,
    /// `created_at` ascending.
    Oldest,
    /// `points` descending.
    PointsHigh,
    /// `points` ascending.
    PointsLow,
    /// `view_count` descending.
    MostViewed,
}

impl SortKey {
    /// All sort keys in menu order.
    pub const ALL: [SortKey; 5] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::PointsHigh,
        SortKey::PointsLow,
        SortKey::MostViewed,
    ];

    /// Wire name (`newest`, `oldest`, `points-high`, `points-low`,
    /// `most-viewed`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::PointsHigh => "points-high",
            Self::PointsLow => "points-low",
            Self::MostViewed => "most-viewed",
        }
    }

    /// Compares two listings under this key.
    ///
    /// Equal keys compare `Equal`, so a stable sort keeps input order for
    /// ties.
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::Oldest => a.created_at.cmp(&b.created_at),
            Self::PointsHigh => b.points.cmp(&a.points),
            Self::PointsLow => a.points.cmp(&b.points),
            Self::MostViewed => b.view_count.cmp(&a.view_count),
        }
    }
}

impl From<&str> for SortKey {
    fn from(value: &str) -> Self {
        match value.trim() {
            "oldest" => Self::Oldest,
            "points-high" => Self::PointsHigh,
            "points-low" => Self::PointsLow,
            "most-viewed" => Self::MostViewed,
            _ => Self::Newest,
        }
    }
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::NewListing;
    use crate::types::{Timestamp, UserId};

    fn listing(points: u32, created_ms: i64, views: u64) -> Listing {
        let mut listing = Listing::from_new(NewListing {
            title: "item".into(),
            points,
            owner_id: UserId::new("u"),
            ..Default::default()
        });
        listing.created_at = Timestamp::from_millis(created_ms);
        listing.view_count = views;
        listing
    }

    #[test]
    fn test_parse_roundtrip() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::from(key.as_str()), key);
            assert_eq!(key.to_string(), key.as_str());
        }
    }

    #[test]
    fn test_unknown_falls_back_to_newest() {
        assert_eq!(SortKey::from(""), SortKey::Newest);
        assert_eq!(SortKey::from("Points-High"), SortKey::Newest);
        let key: SortKey = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(key, SortKey::Newest);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&SortKey::MostViewed).unwrap();
        assert_eq!(json, "\"most-viewed\"");
    }

    #[test]
    fn test_compare_directions() {
        let old_cheap = listing(10, 1_000, 5);
        let new_dear = listing(90, 2_000, 1);

        assert_eq!(SortKey::Newest.compare(&new_dear, &old_cheap), Ordering::Less);
        assert_eq!(SortKey::Oldest.compare(&old_cheap, &new_dear), Ordering::Less);
        assert_eq!(SortKey::PointsHigh.compare(&new_dear, &old_cheap), Ordering::Less);
        assert_eq!(SortKey::PointsLow.compare(&old_cheap, &new_dear), Ordering::Less);
        assert_eq!(SortKey::MostViewed.compare(&old_cheap, &new_dear), Ordering::Less);
    }

    #[test]
    fn test_equal_keys_compare_equal() {
        let a = listing(40, 1_000, 3);
        let b = listing(40, 1_000, 3);
        for key in SortKey::ALL {
            assert_eq!(key.compare(&a, &b), Ordering::Equal);
        }
    }
}
