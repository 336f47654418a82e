//! # SwapShelf
//!
//! Core of a clothing-swap marketplace: a catalog query engine over
//! listings, an embedded listing repository, and an advisory text
//! generation seam for the listing form.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use swapshelf::{Config, Facet, FilterConfig, Marketplace, NewListing, UserId};
//!
//! # fn main() -> swapshelf::Result<()> {
//! // Open or create a store
//! let market = Marketplace::open("./market.db", Config::default())?;
//!
//! // List an item
//! market.create_listing(NewListing {
//!     title: "Elegant Black Dress".into(),
//!     category: Some("Dresses".into()),
//!     size: "S".into(),
//!     points: 60,
//!     owner_id: UserId::new("user-2"),
//!     ..Default::default()
//! })?;
//!
//! // Browse
//! let view = market.browse(&FilterConfig {
//!     category: Facet::from("Dresses"),
//!     ..Default::default()
//! })?;
//! assert_eq!(view.active_filters, 1);
//!
//! market.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Concepts
//!
//! ### Listing
//!
//! A **listing** is one swappable item: title, description, category, size,
//! condition, tags and a price in points. Records of any supported shape are
//! normalized into [`Listing`] at the repository boundary.
//!
//! ### Catalog query
//!
//! [`filter_sort`] and [`browse`] are pure functions of a listing slice and
//! a [`FilterConfig`]. They never fail, never mutate their input, and keep
//! input order for ties.
//!
//! ### Text generation
//!
//! A [`TextGenerator`](generate::TextGenerator) turns `(prompt, mode)` into
//! text. It is disabled by default and never blocks listing creation.
//!
//! ## Features
//!
//! - `gemini` - Enable the Gemini HTTP text generation provider
//!
//! ## Thread Safety
//!
//! `Marketplace` is `Send + Sync` and can be shared across threads using
//! `Arc`. The store uses MVCC for concurrent reads with exclusive write
//! locking.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod config;
mod db;
mod error;
mod favorites;
mod types;

pub mod catalog;
pub mod generate;
pub mod listing;
pub mod storage;

// ============================================================================
// Public API re-exports
// ============================================================================

// Main marketplace interface
pub use db::Marketplace;

// Configuration
pub use config::{
    Config, SyncMode, TextGenerationProvider, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL,
};

// Error handling
pub use error::{NotFoundError, Result, StorageError, SwapShelfError, ValidationError};

// Core types
pub use types::{ListingId, Timestamp, UserId};

// Domain types
pub use listing::{
    parse_tags, Condition, ImportReport, Listing, ListingUpdate, NewListing, RawListing,
};

// Catalog query engine
pub use catalog::{browse, filter_sort, parse_points_bound, CatalogView, Facet, FilterConfig, SortKey};

// Text generation
pub use generate::{GenerationMode, GenerationRequest};

// Storage (for advanced users)
pub use storage::DatabaseMetadata;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common SwapShelf usage.
///
/// ```rust
/// use swapshelf::prelude::*;
/// ```
pub mod prelude {
    pub use crate::catalog::{browse, filter_sort, CatalogView, Facet, FilterConfig, SortKey};
    pub use crate::config::{Config, SyncMode};
    pub use crate::db::Marketplace;
    pub use crate::error::{Result, SwapShelfError};
    pub use crate::generate::{GenerationMode, GenerationRequest, TextGenerator};
    pub use crate::listing::{Condition, Listing, NewListing};
    pub use crate::types::{ListingId, Timestamp, UserId};
}
