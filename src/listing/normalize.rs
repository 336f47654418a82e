//! Normalization of loosely shaped listing records.
//!
//! Listing data arrives in more than one shape: snake_case rows
//! (`created_at`, `view_count`, `is_available`) and camelCase records
//! (`createdAt`, `viewCount`, `isSwapAvailable`), with condition stored
//! either as a canonical value or as a form label such as `"Like New"`.
//! [`RawListing`] accepts all of them; [`RawListing::normalize`] produces
//! the single canonical [`Listing`] the catalog engine works on.
//!
//! Normalization is permissive: only a missing title is an error. Every
//! other missing or malformed field degrades to a default, and reading a
//! record into [`RawListing`] never fails.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::listing::types::{Condition, Listing};
use crate::types::{ListingId, Timestamp, UserId};

/// A listing record as found at the repository boundary.
///
/// Deserializes from any JSON value and never fails: unknown fields are
/// ignored, a field of the wrong type reads as absent, and a non-object
/// value yields an empty record (which [`normalize`](Self::normalize)
/// then rejects for its missing title). Every supported spelling of a
/// field is read, so records carrying both `category` and `category_id`,
/// or both `created_at` and `createdAt`, are accepted; the first
/// non-blank spelling wins.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct RawListing {
    /// Identifier; kept only if it is a valid UUID.
    pub id: Option<String>,
    /// Title (required).
    pub title: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Category name.
    pub category: Option<String>,
    /// Category reference, used as the name when `category` is blank.
    pub category_id: Option<String>,
    /// Size label.
    pub size: Option<String>,
    /// Condition in any supported spelling.
    pub condition: Option<String>,
    /// Tags.
    pub tags: Option<Vec<String>>,
    /// Points, number or numeric string.
    pub points: Option<Value>,
    /// Location.
    pub location: Option<String>,
    /// Image references.
    pub images: Option<Vec<String>>,
    /// Uploader id (`owner_id`, `ownerId`, `user_id` or `userId`).
    pub owner_id: Option<String>,
    /// Embedded uploader object, used when no owner id is given.
    pub uploader: Option<RawUploader>,
    /// View counter, number or numeric string.
    pub view_count: Option<Value>,
    /// Availability flag.
    pub is_available: Option<bool>,
    /// Creation time: RFC 3339, `YYYY-MM-DD` or Unix millis.
    pub created_at: Option<Value>,
    /// Last modification time, same formats as `created_at`.
    pub updated_at: Option<Value>,
}

/// Uploader summary embedded in some listing records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct RawUploader {
    /// Uploader id.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
}

impl From<Value> for RawListing {
    fn from(value: Value) -> Self {
        let Value::Object(record) = value else {
            return Self::default();
        };

        Self {
            id: text(&record, &["id"]),
            title: text(&record, &["title"]),
            description: text(&record, &["description"]),
            category: text(&record, &["category"]),
            category_id: text(&record, &["category_id", "categoryId"]),
            size: text(&record, &["size"]),
            condition: text(&record, &["condition"]),
            tags: list(&record, &["tags"]),
            points: raw(&record, &["points"]),
            location: text(&record, &["location"]),
            images: list(&record, &["images"]),
            owner_id: text(&record, &["owner_id", "ownerId", "user_id", "userId"]),
            uploader: match record.get("uploader") {
                Some(uploader @ Value::Object(_)) => Some(RawUploader::from(uploader.clone())),
                _ => None,
            },
            view_count: raw(&record, &["view_count", "viewCount"]),
            is_available: flag(
                &record,
                &["is_available", "isAvailable", "isSwapAvailable", "is_swap_available"],
            ),
            created_at: raw(&record, &["created_at", "createdAt"]),
            updated_at: raw(&record, &["updated_at", "updatedAt"]),
        }
    }
}

impl From<Value> for RawUploader {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(record) => Self {
                id: text(&record, &["id"]),
                name: text(&record, &["name"]),
            },
            _ => Self::default(),
        }
    }
}

/// First non-blank string under any of `keys`. Numbers read as their
/// decimal text; other types are skipped.
fn text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| match record.get(*key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .next()
}

/// First non-null value under any of `keys`, left for the caller to coerce.
fn raw(record: &Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
        .cloned()
}

/// String list under any of `keys`. Non-string entries are dropped; a bare
/// string is split like tag input.
fn list(record: &Map<String, Value>, keys: &[&str]) -> Option<Vec<String>> {
    keys.iter()
        .filter_map(|key| match record.get(*key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            Value::String(s) => Some(super::parse_tags(s)),
            _ => None,
        })
        .next()
}

/// Boolean under any of `keys`; accepts `"true"`/`"false"` and `0`/`1`.
fn flag(record: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter()
        .filter_map(|key| match record.get(*key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            _ => None,
        })
        .next()
}

impl RawListing {
    /// Maps this record onto the canonical [`Listing`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::RequiredField` if the title is missing or
    /// blank. No other input is rejected.
    pub fn normalize(self) -> Result<Listing> {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ValidationError::required_field("title"))?
            .to_string();

        let id = self
            .id
            .as_deref()
            .and_then(|s| s.parse::<ListingId>().ok())
            .unwrap_or_default();
        let id = if id == ListingId::nil() {
            ListingId::new()
        } else {
            id
        };

        let created_at = self
            .created_at
            .as_ref()
            .and_then(value_to_timestamp)
            .unwrap_or_default();
        let updated_at = self
            .updated_at
            .as_ref()
            .and_then(value_to_timestamp)
            .unwrap_or(created_at);

        let owner_id = self
            .owner_id
            .or_else(|| self.uploader.and_then(|u| u.id))
            .unwrap_or_default();

        Ok(Listing {
            id,
            title,
            description: self.description.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .or(self.category_id)
                .filter(|c| !c.trim().is_empty()),
            size: self.size.unwrap_or_default(),
            condition: self
                .condition
                .as_deref()
                .map(Condition::parse)
                .unwrap_or_default(),
            tags: self
                .tags
                .unwrap_or_default()
                .into_iter()
                .filter(|t| !t.trim().is_empty())
                .collect(),
            points: self
                .points
                .as_ref()
                .and_then(value_to_i64)
                .map(clamp_u32)
                .unwrap_or(0),
            location: self.location.unwrap_or_default(),
            images: self.images.unwrap_or_default(),
            owner_id: UserId::new(owner_id),
            view_count: self
                .view_count
                .as_ref()
                .and_then(value_to_i64)
                .map(|v| v.max(0) as u64)
                .unwrap_or(0),
            is_available: self.is_available.unwrap_or(true),
            created_at,
            updated_at,
        })
    }
}

/// Outcome of importing a batch of raw listings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Ids of listings that were stored, in input order.
    pub imported: Vec<ListingId>,
    /// Input positions of records that failed normalization.
    pub skipped: Vec<usize>,
}

impl ImportReport {
    /// Total number of records looked at.
    pub fn total(&self) -> usize {
        self.imported.len() + self.skipped.len()
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| u.min(i64::MAX as u64) as i64))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn value_to_timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => Timestamp::parse(s),
        Value::Number(_) => value_to_i64(value).map(Timestamp::from_millis),
        _ => None,
    }
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}
