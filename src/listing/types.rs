//! Type definitions for listings.
//!
//! A **listing** is a single swappable clothing item. The catalog engine
//! only ever sees the canonical [`Listing`] shape defined here; loosely
//! shaped records are mapped onto it by [`super::normalize`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{ListingId, Timestamp, UserId};

// ============================================================================
// Condition
// ============================================================================

/// Wear condition of a listed item.
///
/// Parsing is total: unknown labels fall into [`Condition::Fair`] so a
/// malformed stored value can always be filtered and displayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// Like new, no visible wear.
    Excellent,
    /// Light wear.
    Good,
    /// Visible wear; also the bucket for unrecognized labels.
    #[default]
    Fair,
}

impl Condition {
    /// All conditions, best first.
    pub const ALL: [Condition; 3] = [Condition::Excellent, Condition::Good, Condition::Fair];

    /// Maps any condition label onto the canonical enum.
    ///
    /// Case-insensitive and whitespace-trimmed. Form labels such as
    /// `"Like New"` and `"Well-Loved"` are recognized.
    ///
    /// ```rust
    /// use swapshelf::Condition;
    ///
    /// assert_eq!(Condition::parse("Like New"), Condition::Excellent);
    /// assert_eq!(Condition::parse("good"), Condition::Good);
    /// assert_eq!(Condition::parse("torn"), Condition::Fair);
    /// ```
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "excellent" | "like new" | "like-new" | "new" | "mint" => Self::Excellent,
            "good" => Self::Good,
            _ => Self::Fair,
        }
    }

    /// Canonical storage value (`excellent`, `good`, `fair`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
        }
    }

    /// Label shown on the listing form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Like New",
            Self::Good => "Good",
            Self::Fair => "Fair",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Listing: The full stored record
// ============================================================================

/// A stored listing in canonical shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Unique identifier (UUID v7, time-ordered).
    pub id: ListingId,

    /// Short title, e.g. "Vintage Denim Jacket".
    pub title: String,

    /// Free-text description.
    pub description: String,

    /// Category name such as "Outerwear"; `None` when uncategorized.
    pub category: Option<String>,

    /// Free-form size label ("M", "One Size", "9"); may be empty.
    pub size: String,

    /// Wear condition.
    pub condition: Condition,

    /// Free-text labels. Display order is preserved.
    pub tags: Vec<String>,

    /// Cost of the listing in the points economy.
    pub points: u32,

    /// Free-text pickup location; may be empty.
    pub location: String,

    /// Image references (opaque URLs).
    pub images: Vec<String>,

    /// The uploader.
    pub owner_id: UserId,

    /// How many times the detail view was opened.
    pub view_count: u64,

    /// Whether the item can currently be swapped.
    pub is_available: bool,

    /// When this listing was created.
    pub created_at: Timestamp,

    /// When this listing was last modified.
    pub updated_at: Timestamp,
}

impl Listing {
    /// Builds a stored listing from creation input.
    ///
    /// Assigns a fresh id, sets both timestamps to now, marks the listing
    /// available and starts the view counter at zero.
    pub fn from_new(new: NewListing) -> Self {
        let now = Timestamp::now();
        Self {
            id: ListingId::new(),
            title: new.title.trim().to_string(),
            description: new.description,
            category: new.category.filter(|c| !c.trim().is_empty()),
            size: new.size,
            condition: new.condition,
            tags: new.tags,
            points: new.points,
            location: new.location,
            images: new.images,
            owner_id: new.owner_id,
            view_count: 0,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Relative age for item cards, e.g. `"3h ago"`.
    pub fn time_ago(&self, now: Timestamp) -> String {
        self.created_at.time_ago(now)
    }

    /// Applies the `Some` fields of an update and bumps `updated_at`.
    pub(crate) fn apply_update(&mut self, update: &ListingUpdate) {
        if let Some(ref title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(ref description) = update.description {
            self.description = description.clone();
        }
        if let Some(ref category) = update.category {
            self.category = category.clone().filter(|c| !c.trim().is_empty());
        }
        if let Some(ref size) = update.size {
            self.size = size.clone();
        }
        if let Some(condition) = update.condition {
            self.condition = condition;
        }
        if let Some(points) = update.points {
            self.points = points;
        }
        if let Some(ref location) = update.location {
            self.location = location.clone();
        }
        if let Some(ref tags) = update.tags {
            self.tags = tags.clone();
        }
        if let Some(is_available) = update.is_available {
            self.is_available = is_available;
        }
        self.updated_at = Timestamp::now();
    }
}

// ============================================================================
// NewListing: Input for creating listings
// ============================================================================

/// Input for creating a new listing.
///
/// The id, timestamps, availability and view counter are assigned by
/// `Marketplace::create_listing()`.
#[derive(Clone, Debug, Default)]
pub struct NewListing {
    /// Short title (required).
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Category name, if chosen.
    pub category: Option<String>,
    /// Size label.
    pub size: String,
    /// Wear condition.
    pub condition: Condition,
    /// Points asked for the item.
    pub points: u32,
    /// Pickup location.
    pub location: String,
    /// Free-text labels; see [`super::parse_tags`] for form input.
    pub tags: Vec<String>,
    /// Image references.
    pub images: Vec<String>,
    /// The uploader (required).
    pub owner_id: UserId,
}

// ============================================================================
// ListingUpdate: Partial update for mutable fields
// ============================================================================

/// Partial update for a listing. Only `Some` fields are applied.
///
/// `category: Some(None)` clears the category.
#[derive(Clone, Debug, Default)]
pub struct ListingUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category (inner `None` clears it).
    pub category: Option<Option<String>>,
    /// New size label.
    pub size: Option<String>,
    /// New condition.
    pub condition: Option<Condition>,
    /// New points value.
    pub points: Option<u32>,
    /// New location.
    pub location: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// Mark available / swapped away.
    pub is_available: Option<bool>,
}

impl ListingUpdate {
    /// Returns true if the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.size.is_none()
            && self.condition.is_none()
            && self.points.is_none()
            && self.location.is_none()
            && self.tags.is_none()
            && self.is_available.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_parse_canonical() {
        for condition in Condition::ALL {
            assert_eq!(Condition::parse(condition.as_str()), condition);
        }
    }

    #[test]
    fn test_condition_parse_form_labels() {
        assert_eq!(Condition::parse("Like New"), Condition::Excellent);
        assert_eq!(Condition::parse("  like-new "), Condition::Excellent);
        assert_eq!(Condition::parse("Good"), Condition::Good);
        assert_eq!(Condition::parse("Well-Loved"), Condition::Fair);
    }

    #[test]
    fn test_condition_parse_unknown_is_fair() {
        assert_eq!(Condition::parse(""), Condition::Fair);
        assert_eq!(Condition::parse("pristine-ish"), Condition::Fair);
    }

    #[test]
    fn test_condition_serde_lowercase() {
        let json = serde_json::to_string(&Condition::Excellent).unwrap();
        assert_eq!(json, "\"excellent\"");
        let back: Condition = serde_json::from_str("\"good\"").unwrap();
        assert_eq!(back, Condition::Good);
    }

    #[test]
    fn test_from_new_assigns_defaults() {
        let listing = Listing::from_new(NewListing {
            title: "  Wool Scarf ".into(),
            category: Some("   ".into()),
            owner_id: UserId::new("u1"),
            ..Default::default()
        });

        assert_eq!(listing.title, "Wool Scarf");
        assert!(listing.category.is_none());
        assert!(listing.is_available);
        assert_eq!(listing.view_count, 0);
        assert_eq!(listing.created_at, listing.updated_at);
    }

    #[test]
    fn test_apply_update_only_touches_some_fields() {
        let mut listing = Listing::from_new(NewListing {
            title: "Boots".into(),
            size: "9".into(),
            points: 55,
            owner_id: UserId::new("u1"),
            ..Default::default()
        });

        listing.apply_update(&ListingUpdate {
            points: Some(40),
            category: Some(Some("Shoes".into())),
            ..Default::default()
        });

        assert_eq!(listing.points, 40);
        assert_eq!(listing.category.as_deref(), Some("Shoes"));
        assert_eq!(listing.size, "9");
        assert_eq!(listing.title, "Boots");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ListingUpdate::default().is_empty());
        let update = ListingUpdate {
            is_available: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_listing_bincode_roundtrip() {
        let listing = Listing::from_new(NewListing {
            title: "Dress".into(),
            tags: vec!["black".into(), "evening".into()],
            owner_id: UserId::new("u2"),
            ..Default::default()
        });
        let bytes = bincode::serialize(&listing).unwrap();
        let restored: Listing = bincode::deserialize(&bytes).unwrap();
        assert_eq!(listing, restored);
    }
}
