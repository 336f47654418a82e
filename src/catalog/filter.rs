//! Filter criteria for catalog queries.
//!
//! [`FilterConfig`] is the whole state of a browse query: search text,
//! three facet axes, a points range and a sort key. It is rebuilt from the
//! caller's inputs on every query and carries no hidden state.
//!
//! All predicates are conjunctive; an axis left at its default does not
//! constrain the result.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::catalog::sort::SortKey;
use crate::listing::Listing;

/// Sentinel label meaning "no filtering on this axis".
pub const ALL: &str = "All";

/// One filter axis: either unconstrained or a single exact value.
///
/// Matching is exact and case-sensitive; the values come from the same
/// enumerated set used for storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Facet {
    /// No filtering.
    #[default]
    All,
    /// Only listings whose value equals this one.
    Only(String),
}

impl Facet {
    /// Returns true if this facet constrains the result.
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Only(_))
    }

    /// Returns true if `value` passes this facet.
    ///
    /// A missing value passes only [`Facet::All`].
    #[inline]
    pub fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => value == Some(wanted.as_str()),
        }
    }
}

impl From<&str> for Facet {
    fn from(value: &str) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl From<String> for Facet {
    fn from(value: String) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<Facet> for String {
    fn from(facet: Facet) -> Self {
        match facet {
            Facet::All => ALL.to_string(),
            Facet::Only(value) => value,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(value) => f.write_str(value),
        }
    }
}

/// Parses a free-text points bound.
///
/// Blank, non-numeric, negative or out-of-range input yields `None` (no
/// bound) so a half-typed field never filters everything out.
///
/// ```rust
/// use swapshelf::parse_points_bound;
///
/// assert_eq!(parse_points_bound(" 40 "), Some(40));
/// assert_eq!(parse_points_bound(""), None);
/// assert_eq!(parse_points_bound("4o"), None);
/// ```
pub fn parse_points_bound(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok()
}

/// Reads a points bound sent by a UI layer.
///
/// Numbers and numeric strings are accepted; blank, negative, fractional,
/// out-of-range or otherwise malformed input reads as no bound.
fn points_bound<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => parse_points_bound(&s),
        _ => None,
    })
}

/// Complete configuration of a catalog query.
///
/// # Example
///
/// ```rust
/// use swapshelf::{Facet, FilterConfig, SortKey};
///
/// let config = FilterConfig {
///     search_text: "denim".into(),
///     category: Facet::from("Outerwear"),
///     sort_key: SortKey::PointsLow,
///     ..FilterConfig::default()
/// };
/// assert_eq!(config.active_filter_count(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    /// Case-insensitive substring matched against title, description and tags.
    pub search_text: String,

    /// Category axis.
    pub category: Facet,

    /// Size axis.
    pub size: Facet,

    /// Condition axis, compared against the canonical condition value.
    pub condition: Facet,

    /// Inclusive lower bound on points.
    #[serde(deserialize_with = "points_bound")]
    pub min_points: Option<u32>,

    /// Inclusive upper bound on points.
    #[serde(deserialize_with = "points_bound")]
    pub max_points: Option<u32>,

    /// Result ordering.
    pub sort_key: SortKey,
}

impl FilterConfig {
    /// Creates the default configuration: everything, newest first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets both points bounds from free-text input.
    ///
    /// Unparsable input clears the corresponding bound.
    pub fn with_points_input(mut self, min: &str, max: &str) -> Self {
        self.min_points = parse_points_bound(min);
        self.max_points = parse_points_bound(max);
        self
    }

    /// Resets every axis and the sort key to their defaults.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns true if this configuration equals the default.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// The trimmed, lowercased search needle, or `None` when empty.
    pub(crate) fn search_needle(&self) -> Option<String> {
        let trimmed = self.search_text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// Number of axes currently constraining the result.
    ///
    /// Counts non-empty search text, each facet other than `All`, and each
    /// points bound that is set. Display only; not used for filtering.
    pub fn active_filter_count(&self) -> usize {
        [
            self.search_needle().is_some(),
            self.category.is_active(),
            self.size.is_active(),
            self.condition.is_active(),
            self.min_points.is_some(),
            self.max_points.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Returns `true` if the given listing passes all filter criteria.
    pub fn matches(&self, listing: &Listing) -> bool {
        match self.search_needle() {
            Some(needle) => self.matches_with_needle(listing, Some(&needle)),
            None => self.matches_with_needle(listing, None),
        }
    }

    /// [`matches`](Self::matches) with the needle computed once per query.
    pub(crate) fn matches_with_needle(&self, listing: &Listing, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            if !text_matches(listing, needle) {
                return false;
            }
        }

        if !self.category.accepts(listing.category.as_deref()) {
            return false;
        }

        if !self.size.accepts(Some(listing.size.as_str())) {
            return false;
        }

        if !self.condition.accepts(Some(listing.condition.as_str())) {
            return false;
        }

        if let Some(min) = self.min_points {
            if listing.points < min {
                return false;
            }
        }

        if let Some(max) = self.max_points {
            if listing.points > max {
                return false;
            }
        }

        true
    }
}

/// `needle` must already be lowercase.
fn text_matches(listing: &Listing, needle: &str) -> bool {
    listing.title.to_lowercase().contains(needle)
        || listing.description.to_lowercase().contains(needle)
        || listing
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}
