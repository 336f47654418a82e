//! Storage layer abstractions for SwapShelf.
//!
//! This module provides a trait-based abstraction over the listing
//! repository, so the marketplace facade does not depend on a concrete
//! backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Marketplace                              │
//! │                         │                                    │
//! │                         ▼                                    │
//! │              ┌─────────────────────┐                        │
//! │              │   StorageEngine     │  ← Trait               │
//! │              └─────────────────────┘                        │
//! │                         ▲                                    │
//! │                   ┌─────┴─────┐                              │
//! │                   │RedbStorage│                              │
//! │                   └───────────┘                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod redb;
pub mod schema;

pub use self::redb::RedbStorage;
pub use schema::{DatabaseMetadata, SCHEMA_VERSION};

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::listing::{Listing, ListingUpdate};
use crate::types::{ListingId, UserId};

/// Storage engine trait for SwapShelf.
///
/// This trait defines the contract that any storage backend must implement.
/// The primary implementation is [`RedbStorage`].
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow the marketplace to be
/// shared across threads. The engine handles internal synchronization.
pub trait StorageEngine: Send + Sync {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Returns the database metadata.
    fn metadata(&self) -> &DatabaseMetadata;

    /// Closes the storage engine, flushing any pending writes.
    ///
    /// This method consumes the storage engine.
    fn close(self: Box<Self>) -> Result<()>;

    /// Returns the path to the database file, if applicable.
    fn path(&self) -> Option<&Path>;

    // =========================================================================
    // Listing Storage Operations
    // =========================================================================

    /// Saves a listing, overwriting any listing with the same ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or serialization fails.
    fn save_listing(&self, listing: &Listing) -> Result<()>;

    /// Retrieves a listing by ID.
    ///
    /// Returns `None` if no listing with the given ID exists.
    fn get_listing(&self, id: ListingId) -> Result<Option<Listing>>;

    /// Lists every stored listing in key order.
    ///
    /// Keys are UUID v7, so key order approximates creation order. Callers
    /// that need a specific order sort the result themselves.
    fn list_listings(&self) -> Result<Vec<Listing>>;

    /// Applies the `Some` fields of an update in a single transaction.
    ///
    /// Returns `true` if the listing existed and was updated,
    /// `false` if not found.
    fn update_listing(&self, id: ListingId, update: &ListingUpdate) -> Result<bool>;

    /// Increments the view counter in a single transaction.
    ///
    /// Returns the updated listing, or `None` if not found.
    fn increment_view_count(&self, id: ListingId) -> Result<Option<Listing>>;

    /// Permanently deletes a listing.
    ///
    /// Returns `true` if the listing existed and was deleted,
    /// `false` if not found. Favorites pointing at it are left in place
    /// and skipped on read.
    fn delete_listing(&self, id: ListingId) -> Result<bool>;

    // =========================================================================
    // Favorites
    // =========================================================================

    /// Records `id` as a favorite of `user`.
    ///
    /// The listing lookup and the insert share one write transaction.
    /// Returns `true` if the pair was newly added, `false` if it was
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::Listing` if no listing with `id` is stored.
    fn add_favorite(&self, user: &UserId, id: ListingId) -> Result<bool>;

    /// Removes `id` from the favorites of `user`.
    ///
    /// Returns `true` if the pair existed.
    fn remove_favorite(&self, user: &UserId, id: ListingId) -> Result<bool>;

    /// Lists the listing ids saved by `user`.
    fn list_favorite_ids(&self, user: &UserId) -> Result<Vec<ListingId>>;

    /// Returns `true` if `user` has saved `id`.
    fn is_favorite(&self, user: &UserId, id: ListingId) -> Result<bool>;
}

/// Opens a storage engine at the given path.
///
/// This is a convenience function that creates a [`RedbStorage`] instance.
///
/// # Errors
///
/// Returns an error if:
/// - The database file is corrupted
/// - The database is locked by another process
/// - Schema version doesn't match
pub fn open_storage(path: impl AsRef<Path>, config: &Config) -> Result<Box<dyn StorageEngine>> {
    let storage = RedbStorage::open(path, config)?;
    Ok(Box::new(storage))
}
