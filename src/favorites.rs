//! Per-user saved listings.
//!
//! Favorites are stored as (user, listing) pairs. Deleting a listing does
//! not touch the pairs that point at it; [`Marketplace::list_favorites`]
//! skips ids whose listing is gone.

use tracing::{debug, instrument};

use crate::db::Marketplace;
use crate::error::Result;
use crate::listing::Listing;
use crate::types::{ListingId, UserId};

impl Marketplace {
    /// Saves a listing to the user's favorites.
    ///
    /// Saving the same listing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::Listing` if the listing does not exist.
    #[instrument(skip(self))]
    pub fn add_favorite(&self, user: &UserId, id: ListingId) -> Result<()> {
        self.storage().add_favorite(user, id)?;
        Ok(())
    }

    /// Removes a listing from the user's favorites.
    ///
    /// Returns `true` if it was saved.
    #[instrument(skip(self))]
    pub fn remove_favorite(&self, user: &UserId, id: ListingId) -> Result<bool> {
        self.storage().remove_favorite(user, id)
    }

    /// Returns the user's saved listings that still exist.
    pub fn list_favorites(&self, user: &UserId) -> Result<Vec<Listing>> {
        let ids = self.storage().list_favorite_ids(user)?;
        let mut listings = Vec::with_capacity(ids.len());
        for id in ids {
            match self.storage().get_listing(id)? {
                Some(listing) => listings.push(listing),
                None => debug!(user = %user, id = %id, "Skipping deleted favorite"),
            }
        }
        Ok(listings)
    }

    /// Returns `true` if the user has saved the listing.
    pub fn is_favorite(&self, user: &UserId, id: ListingId) -> Result<bool> {
        self.storage().is_favorite(user, id)
    }
}
