//! Listing management module.
//!
//! A **listing** is a single swappable item. This module holds the
//! canonical [`Listing`] record, creation and update inputs, their
//! validation, and the normalization step that maps raw repository records
//! onto the canonical shape.
//!
//! # Operations
//!
//! All listing operations are available on [`Marketplace`](crate::Marketplace):
//!
//! - [`create_listing(new)`](crate::Marketplace::create_listing)
//! - [`get_listing(id)`](crate::Marketplace::get_listing)
//! - [`record_view(id)`](crate::Marketplace::record_view)
//! - [`update_listing(id, update)`](crate::Marketplace::update_listing)
//! - [`delete_listing(id)`](crate::Marketplace::delete_listing)
//! - [`fetch_available_listings()`](crate::Marketplace::fetch_available_listings)
//! - [`import_listings(records)`](crate::Marketplace::import_listings)

pub mod normalize;
pub mod types;
pub(crate) mod validation;

pub use normalize::{ImportReport, RawListing, RawUploader};
pub use types::{Condition, Listing, ListingUpdate, NewListing};

/// Splits comma-separated tag input from the listing form.
///
/// Tags are trimmed, empty entries dropped, and case-insensitive duplicates
/// removed keeping the first spelling.
///
/// ```rust
/// use swapshelf::parse_tags;
///
/// assert_eq!(
///     parse_tags("vintage, Denim ,, denim, classic"),
///     vec!["vintage", "Denim", "classic"],
/// );
/// ```
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut tags = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let folded = tag.to_lowercase();
        if !seen.contains(&folded) {
            seen.push(folded);
            tags.push(tag.to_string());
        }
    }
    tags
}
