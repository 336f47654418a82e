//! Input validation for listings.
//!
//! Validates [`NewListing`] and [`ListingUpdate`] fields before they reach
//! the storage layer. All size/count constraints are defined as constants in
//! [`crate::storage::schema`].
//!
//! ```text
//! Marketplace::create_listing()
//!     ├── validate_new_listing()
//!     └── storage.save_listing()      ← only reached if valid
//! ```

use crate::error::{SwapShelfError, ValidationError};
use crate::listing::types::{ListingUpdate, NewListing};
use crate::storage::schema::{
    MAX_DESCRIPTION_LENGTH, MAX_FIELD_LENGTH, MAX_IMAGES, MAX_TAGS, MAX_TAG_LENGTH,
    MAX_TITLE_LENGTH,
};

/// Validates a [`NewListing`] before storage.
///
/// # Rules
///
/// | Field | Constraint |
/// |-------|------------|
/// | `title` | Non-empty after trim, max 200 chars |
/// | `description` | Max 5 000 chars |
/// | `category`, `size`, `location` | Max 100 chars each |
/// | `tags` | Max 20 tags, each non-empty and max 50 chars |
/// | `images` | Max 5 |
/// | `owner_id` | Non-empty |
pub(crate) fn validate_new_listing(listing: &NewListing) -> Result<(), SwapShelfError> {
    validate_title(&listing.title)?;
    validate_description(&listing.description)?;

    if let Some(ref category) = listing.category {
        validate_short_field("category", category)?;
    }
    validate_short_field("size", &listing.size)?;
    validate_short_field("location", &listing.location)?;

    validate_tags(&listing.tags)?;

    if listing.images.len() > MAX_IMAGES {
        return Err(
            ValidationError::too_many_items("images", listing.images.len(), MAX_IMAGES).into(),
        );
    }

    if listing.owner_id.as_str().trim().is_empty() {
        return Err(ValidationError::required_field("owner_id").into());
    }

    Ok(())
}

/// Validates a [`ListingUpdate`] before applying.
///
/// Only validates fields that are `Some(...)`.
pub(crate) fn validate_listing_update(update: &ListingUpdate) -> Result<(), SwapShelfError> {
    if let Some(ref title) = update.title {
        validate_title(title)?;
    }
    if let Some(ref description) = update.description {
        validate_description(description)?;
    }
    if let Some(Some(ref category)) = update.category {
        validate_short_field("category", category)?;
    }
    if let Some(ref size) = update.size {
        validate_short_field("size", size)?;
    }
    if let Some(ref location) = update.location {
        validate_short_field("location", location)?;
    }
    if let Some(ref tags) = update.tags {
        validate_tags(tags)?;
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), SwapShelfError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::required_field("title").into());
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::content_too_large("title", len, MAX_TITLE_LENGTH).into());
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), SwapShelfError> {
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::content_too_large(
            "description",
            len,
            MAX_DESCRIPTION_LENGTH,
        )
        .into());
    }
    Ok(())
}

fn validate_short_field(field: &str, value: &str) -> Result<(), SwapShelfError> {
    let len = value.chars().count();
    if len > MAX_FIELD_LENGTH {
        return Err(ValidationError::content_too_large(field, len, MAX_FIELD_LENGTH).into());
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), SwapShelfError> {
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::too_many_items("tags", tags.len(), MAX_TAGS).into());
    }

    for (i, tag) in tags.iter().enumerate() {
        if tag.trim().is_empty() {
            return Err(ValidationError::invalid_field(
                "tags",
                format!("tag at index {} is empty", i),
            )
            .into());
        }
        let len = tag.chars().count();
        if len > MAX_TAG_LENGTH {
            return Err(ValidationError::invalid_field(
                "tags",
                format!(
                    "tag at index {} exceeds max length of {} chars (got {})",
                    i, MAX_TAG_LENGTH, len
                ),
            )
            .into());
        }
    }

    Ok(())
}
