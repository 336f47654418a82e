//! Marketplace main struct and lifecycle operations.
//!
//! The [`Marketplace`] struct is the primary interface for interacting with
//! the listing store. It provides methods for:
//!
//! - Opening and closing the store
//! - Creating, updating and deleting listings
//! - Browsing the catalog with a [`FilterConfig`]
//! - Saving favorites (see [`crate::favorites`])
//! - Advisory text generation for the listing form
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use swapshelf::{Config, FilterConfig, Marketplace, NewListing, SortKey, UserId};
//!
//! # fn main() -> swapshelf::Result<()> {
//! let market = Marketplace::open("./market.db", Config::default())?;
//!
//! market.create_listing(NewListing {
//!     title: "Vintage Denim Jacket".into(),
//!     category: Some("Outerwear".into()),
//!     size: "M".into(),
//!     points: 45,
//!     owner_id: UserId::new("user-1"),
//!     ..Default::default()
//! })?;
//!
//! let view = market.browse(&FilterConfig {
//!     search_text: "denim".into(),
//!     sort_key: SortKey::PointsLow,
//!     ..Default::default()
//! })?;
//! println!("{} results", view.total);
//!
//! market.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! `Marketplace` is `Send + Sync` and can be shared across threads using
//! `Arc`. The underlying storage uses MVCC for concurrent reads with
//! exclusive write locking.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::catalog::{self, CatalogView, FilterConfig};
use crate::config::Config;
use crate::error::{NotFoundError, Result, SwapShelfError};
use crate::generate::{create_text_generator, GenerationRequest, TextGenerator};
use crate::listing::validation::{validate_listing_update, validate_new_listing};
use crate::listing::{ImportReport, Listing, ListingUpdate, NewListing, RawListing};
use crate::storage::{open_storage, DatabaseMetadata, StorageEngine};
use crate::types::{ListingId, UserId};

/// The main SwapShelf marketplace handle.
///
/// Create an instance with [`Marketplace::open()`] and close it with
/// [`Marketplace::close()`].
///
/// # Ownership
///
/// `Marketplace` owns its storage and text generator. `close()` consumes
/// the handle so it cannot be used afterward.
pub struct Marketplace {
    /// Listing repository.
    storage: Box<dyn StorageEngine>,

    /// Text generation provider (disabled unless configured).
    generator: Box<dyn TextGenerator>,

    /// Configuration used to open this marketplace.
    config: Config,
}

impl std::fmt::Debug for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marketplace")
            .field("config", &self.config)
            .field("generator", &self.generator.name())
            .finish_non_exhaustive()
    }
}

impl Marketplace {
    /// Opens or creates a marketplace store at the specified path.
    ///
    /// The text generator is built from `config.text_generation`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration is invalid (see [`Config::validate`])
    /// - Database file is corrupted
    /// - Database is locked by another process
    /// - Schema version doesn't match
    /// - The configured text generator is unavailable in this build
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        config.validate().map_err(SwapShelfError::from)?;
        let generator = create_text_generator(&config)?;
        Self::open_inner(path.as_ref(), config, generator)
    }

    /// Opens a marketplace with a caller-supplied text generator.
    ///
    /// `config.text_generation` is ignored; everything else applies as in
    /// [`Marketplace::open`].
    #[instrument(skip(config, generator), fields(path = %path.as_ref().display()))]
    pub fn open_with_generator(
        path: impl AsRef<Path>,
        config: Config,
        generator: Box<dyn TextGenerator>,
    ) -> Result<Self> {
        config.validate().map_err(SwapShelfError::from)?;
        Self::open_inner(path.as_ref(), config, generator)
    }

    fn open_inner(path: &Path, config: Config, generator: Box<dyn TextGenerator>) -> Result<Self> {
        info!("Opening marketplace");

        let storage = open_storage(path, &config)?;

        info!(
            sync_mode = ?config.sync_mode,
            generator = generator.name(),
            "Marketplace opened successfully"
        );

        Ok(Self {
            storage,
            generator,
            config,
        })
    }

    /// Closes the marketplace, flushing all pending writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend reports a flush failure.
    #[instrument(skip(self))]
    pub fn close(self) -> Result<()> {
        info!("Closing marketplace");
        self.storage.close()?;
        info!("Marketplace closed successfully");
        Ok(())
    }

    /// Returns the configuration used to open this marketplace.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the database metadata.
    #[inline]
    pub fn metadata(&self) -> &DatabaseMetadata {
        self.storage.metadata()
    }

    #[inline]
    pub(crate) fn storage(&self) -> &dyn StorageEngine {
        self.storage.as_ref()
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Creates a listing and returns its id.
    ///
    /// The listing starts available, with zero views and both timestamps set
    /// to now.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the input breaks a field limit (see
    /// [`crate::storage::schema`]).
    #[instrument(skip(self, new), fields(title = %new.title))]
    pub fn create_listing(&self, new: NewListing) -> Result<ListingId> {
        validate_new_listing(&new)?;

        let listing = Listing::from_new(new);
        let id = listing.id;
        self.storage.save_listing(&listing)?;

        info!(id = %id, "Listing created");
        Ok(id)
    }

    /// Returns a listing by id, or `None` if it does not exist.
    pub fn get_listing(&self, id: ListingId) -> Result<Option<Listing>> {
        self.storage.get_listing(id)
    }

    /// Counts a detail-page view and returns the updated listing.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::Listing` if the listing does not exist.
    pub fn record_view(&self, id: ListingId) -> Result<Listing> {
        self.storage
            .increment_view_count(id)?
            .ok_or_else(|| NotFoundError::listing(id).into())
    }

    /// Applies a partial update to a listing.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for invalid fields and
    /// `NotFoundError::Listing` if the listing does not exist.
    #[instrument(skip(self, update))]
    pub fn update_listing(&self, id: ListingId, update: ListingUpdate) -> Result<()> {
        validate_listing_update(&update)?;

        if !self.storage.update_listing(id, &update)? {
            return Err(NotFoundError::listing(id).into());
        }

        info!(id = %id, "Listing updated");
        Ok(())
    }

    /// Permanently deletes a listing.
    ///
    /// # Errors
    ///
    /// Returns `NotFoundError::Listing` if the listing does not exist.
    #[instrument(skip(self))]
    pub fn delete_listing(&self, id: ListingId) -> Result<()> {
        if !self.storage.delete_listing(id)? {
            return Err(NotFoundError::listing(id).into());
        }

        info!(id = %id, "Listing deleted");
        Ok(())
    }

    /// Returns every available listing, newest first.
    ///
    /// This is the repository's own order; [`browse`](Self::browse) re-sorts
    /// by the requested key.
    pub fn fetch_available_listings(&self) -> Result<Vec<Listing>> {
        let mut listings: Vec<Listing> = self
            .storage
            .list_listings()?
            .into_iter()
            .filter(|l| l.is_available)
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    /// Returns every listing uploaded by `owner`, available or not, newest
    /// first.
    pub fn list_listings_by_owner(&self, owner: &UserId) -> Result<Vec<Listing>> {
        let mut listings: Vec<Listing> = self
            .storage
            .list_listings()?
            .into_iter()
            .filter(|l| &l.owner_id == owner)
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    /// Fetches available listings and runs the catalog query over them.
    ///
    /// # Errors
    ///
    /// Only repository errors; the query itself cannot fail.
    pub fn browse(&self, config: &FilterConfig) -> Result<CatalogView> {
        let listings = self.fetch_available_listings()?;
        Ok(catalog::browse(&listings, config))
    }

    /// Distinct categories across all stored listings, sorted by name.
    pub fn list_categories(&self) -> Result<Vec<String>> {
        let categories: BTreeSet<String> = self
            .storage
            .list_listings()?
            .into_iter()
            .filter_map(|l| l.category)
            .collect();
        Ok(categories.into_iter().collect())
    }

    /// Normalizes and stores a batch of raw listing records.
    ///
    /// Accepts [`RawListing`]s or plain `serde_json::Value`s; each value is
    /// read on its own, so one malformed record cannot reject the batch.
    /// Records that fail normalization are skipped and reported by input
    /// position; a storage failure aborts the batch.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn import_listings<R>(&self, records: Vec<R>) -> Result<ImportReport>
    where
        R: Into<RawListing>,
    {
        let mut report = ImportReport::default();

        for (index, record) in records.into_iter().enumerate() {
            let raw: RawListing = record.into();
            match raw.normalize() {
                Ok(listing) => {
                    self.storage.save_listing(&listing)?;
                    report.imported.push(listing.id);
                }
                Err(e) => {
                    warn!(index = index, error = %e, "Skipping listing record");
                    report.skipped.push(index);
                }
            }
        }

        info!(
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            "Listing import finished"
        );
        Ok(report)
    }

    // =========================================================================
    // Text generation
    // =========================================================================

    /// Runs the configured text generator, bounded by
    /// `config.generation_timeout`.
    ///
    /// Must be called from within a tokio runtime. Never touches storage.
    ///
    /// # Errors
    ///
    /// Returns `SwapShelfError::Generation` if the provider fails, is
    /// disabled, or does not answer in time.
    pub async fn generate_text(&self, request: &GenerationRequest) -> Result<String> {
        let timeout = self.config.generation_timeout;
        debug!(mode = %request.mode, generator = self.generator.name(), "Generating text");

        let result = match tokio::time::timeout(timeout, self.generator.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(SwapShelfError::generation(format!(
                "{} did not respond within {} ms",
                self.generator.name(),
                timeout.as_millis()
            ))),
        };

        if let Err(ref e) = result {
            warn!(mode = %request.mode, error = %e, "Text generation failed");
        }
        result
    }
}

// Marketplace is auto Send + Sync: Box<dyn StorageEngine>,
// Box<dyn TextGenerator> and Config are all Send + Sync.
