//! Core type definitions for SwapShelf identifiers and timestamps.
//!
//! Listing identifiers use UUID v7 so that freshly created listings are
//! time-ordered even before any secondary index is consulted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Listing identifier (UUID v7 for time-ordering).
///
/// # Example
/// ```
/// use swapshelf::ListingId;
///
/// let id = ListingId::new();
/// let parsed: ListingId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub Uuid);

impl ListingId {
    /// Creates a new ListingId with a UUID v7 (time-ordered).
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a nil (all zeros) ListingId.
    #[inline]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Returns the raw UUID bytes for storage.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Creates a ListingId from raw bytes.
    #[inline]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for ListingId {
    /// Returns a nil (all zeros) ListingId.
    ///
    /// For a new unique ID, use [`ListingId::new()`].
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Opaque user identifier.
///
/// SwapShelf doesn't handle authentication - the consumer provides user IDs
/// from whatever auth system fronts the marketplace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Creates a new UserId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix timestamp in milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(pub i64);

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

impl Timestamp {
    /// Creates a timestamp for the current moment.
    ///
    /// If the system clock is before the Unix epoch, returns epoch rather
    /// than panicking.
    #[inline]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self(duration.as_millis() as i64)
    }

    /// Creates a timestamp from Unix milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as Unix milliseconds.
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Parses a timestamp from the textual forms found in listing records.
    ///
    /// Accepts RFC 3339 (`2024-01-15T10:30:00Z`), a plain date
    /// (`2024-01-15`, midnight UTC) or integer milliseconds. Returns `None`
    /// for anything else.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(input) {
            return Some(Self(dt.timestamp_millis()));
        }

        if let Ok(date) = chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| Self(dt.and_utc().timestamp_millis()));
        }

        input.parse::<i64>().ok().map(Self)
    }

    /// Relative age as shown on item cards.
    ///
    /// `"Just now"` under an hour, `"{h}h ago"` under a day, `"{d}d ago"`
    /// beyond that. Timestamps in the future read as `"Just now"`.
    pub fn time_ago(&self, now: Timestamp) -> String {
        let hours = now.0.saturating_sub(self.0).max(0) / MILLIS_PER_HOUR;
        if hours < 1 {
            "Just now".to_string()
        } else if hours < 24 {
            format!("{}h ago", hours)
        } else {
            format!("{}d ago", hours / 24)
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
