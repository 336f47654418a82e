//! redb storage engine implementation.
//!
//! This module provides the listing repository backend for SwapShelf using
//! [redb](https://docs.rs/redb), a pure Rust embedded key-value store.
//!
//! # Features
//!
//! - ACID transactions with MVCC
//! - Single-writer, multiple-reader concurrency
//! - Automatic crash recovery
//!
//! Every mutating method opens and commits its own write transaction, with
//! the durability selected by [`SyncMode`].

use std::path::{Path, PathBuf};

use ::redb::{Database, DatabaseError, ReadableTable, WriteTransaction};
use tracing::{debug, info, instrument, warn};

use super::schema::{
    DatabaseMetadata, FAVORITES_TABLE, LISTINGS_TABLE, METADATA_KEY, METADATA_TABLE,
    SCHEMA_VERSION,
};
use super::StorageEngine;
use crate::config::{Config, SyncMode};
use crate::error::{NotFoundError, Result, StorageError, SwapShelfError};
use crate::listing::{Listing, ListingUpdate};
use crate::types::{ListingId, UserId};

/// redb storage engine wrapper.
///
/// Holds the redb database handle and cached metadata.
///
/// # Thread Safety
///
/// `RedbStorage` is `Send + Sync`. redb handles internal synchronization
/// using MVCC for readers and exclusive locking for writers.
#[derive(Debug)]
pub struct RedbStorage {
    /// The redb database handle.
    db: Database,

    /// Cached database metadata.
    metadata: DatabaseMetadata,

    /// Path to the database file.
    path: PathBuf,

    /// Durability applied to every write transaction.
    sync_mode: SyncMode,
}

impl RedbStorage {
    /// Opens or creates a database at the given path.
    ///
    /// A missing file is created and initialized; an existing one has its
    /// metadata checked against the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database file is corrupted
    /// - The database is locked by another process
    /// - Schema version doesn't match
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let db_exists = path.exists();

        debug!(db_exists = db_exists, "Opening storage engine");

        let db = Self::create_database(path, config)?;

        if db_exists {
            Self::open_existing(db, path.to_path_buf(), config.sync_mode)
        } else {
            Self::initialize_new(db, path.to_path_buf(), config.sync_mode)
        }
    }

    /// Creates the redb database with the configured page cache.
    fn create_database(path: &Path, config: &Config) -> Result<Database> {
        let mut builder = Database::builder();
        builder.set_cache_size(config.cache_size_mb.saturating_mul(1024 * 1024));

        let db = builder.create(path).map_err(|e| match e {
            DatabaseError::DatabaseAlreadyOpen => StorageError::DatabaseLocked,
            other => StorageError::from(other),
        })?;

        debug!(cache_size_mb = config.cache_size_mb, "Database file opened");
        Ok(db)
    }

    /// Initializes a new database with tables and metadata.
    #[instrument(skip(db), fields(path = %path.display()))]
    fn initialize_new(db: Database, path: PathBuf, sync_mode: SyncMode) -> Result<Self> {
        info!("Initializing new database");

        let metadata = DatabaseMetadata::new();

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)
                .map_err(|e| StorageError::serialization(e.to_string()))?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;

            let _ = write_txn.open_table(LISTINGS_TABLE)?;
            let _ = write_txn.open_multimap_table(FAVORITES_TABLE)?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(schema_version = SCHEMA_VERSION, "Database initialized");

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode,
        })
    }

    /// Opens and validates an existing database.
    #[instrument(skip(db), fields(path = %path.display()))]
    fn open_existing(db: Database, path: PathBuf, sync_mode: SyncMode) -> Result<Self> {
        info!("Opening existing database");

        let read_txn = db.begin_read().map_err(StorageError::from)?;
        let metadata = {
            let meta_table = read_txn.open_table(METADATA_TABLE).map_err(|e| {
                StorageError::corrupted(format!("Cannot open metadata table: {}", e))
            })?;

            let metadata_bytes = meta_table
                .get(METADATA_KEY)
                .map_err(StorageError::from)?
                .ok_or_else(|| StorageError::corrupted("Missing database metadata"))?;

            bincode::deserialize::<DatabaseMetadata>(metadata_bytes.value())
                .map_err(|e| StorageError::corrupted(format!("Invalid metadata format: {}", e)))?
        };
        drop(read_txn);

        if !metadata.is_compatible() {
            warn!(
                expected = SCHEMA_VERSION,
                found = metadata.schema_version,
                "Schema version mismatch"
            );
            return Err(SwapShelfError::Storage(StorageError::SchemaVersionMismatch {
                expected: SCHEMA_VERSION,
                found: metadata.schema_version,
            }));
        }

        let mut metadata = metadata;
        metadata.touch();

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)
                .map_err(|e| StorageError::serialization(e.to_string()))?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(
            schema_version = metadata.schema_version,
            "Database opened successfully"
        );

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode,
        })
    }

    /// Returns a reference to the underlying redb database.
    #[cfg(test)]
    pub(crate) fn database(&self) -> &Database {
        &self.db
    }

    /// Begins a write transaction with the configured durability.
    fn begin_write(&self) -> Result<WriteTransaction> {
        let mut write_txn = self.db.begin_write().map_err(StorageError::from)?;
        write_txn.set_durability(self.sync_mode.durability());
        write_txn.set_two_phase_commit(self.sync_mode.two_phase_commit());
        Ok(write_txn)
    }
}

fn encode_listing(listing: &Listing) -> Result<Vec<u8>> {
    bincode::serialize(listing)
        .map_err(|e| StorageError::serialization(e.to_string()).into())
}

fn decode_listing(bytes: &[u8]) -> Result<Listing> {
    bincode::deserialize(bytes).map_err(|e| StorageError::serialization(e.to_string()).into())
}

impl StorageEngine for RedbStorage {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    fn metadata(&self) -> &DatabaseMetadata {
        &self.metadata
    }

    #[instrument(skip(self))]
    fn close(self: Box<Self>) -> Result<()> {
        info!("Closing storage engine");

        // redb flushes on drop; Database::drop is infallible.
        drop(self.db);

        info!("Storage engine closed");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    // =========================================================================
    // Listing Storage Operations
    // =========================================================================

    fn save_listing(&self, listing: &Listing) -> Result<()> {
        let bytes = encode_listing(listing)?;

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(LISTINGS_TABLE)?;
            table.insert(listing.id.as_bytes(), bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(id = %listing.id, title = %listing.title, "Listing saved");
        Ok(())
    }

    fn get_listing(&self, id: ListingId) -> Result<Option<Listing>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(LISTINGS_TABLE)?;

        match table.get(id.as_bytes())? {
            Some(value) => Ok(Some(decode_listing(value.value())?)),
            None => Ok(None),
        }
    }

    fn list_listings(&self) -> Result<Vec<Listing>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(LISTINGS_TABLE)?;

        let mut listings = Vec::new();
        for result in table.iter()? {
            let (_, value) = result.map_err(StorageError::from)?;
            listings.push(decode_listing(value.value())?);
        }

        Ok(listings)
    }

    fn update_listing(&self, id: ListingId, update: &ListingUpdate) -> Result<bool> {
        let write_txn = self.begin_write()?;
        let updated;
        {
            let mut table = write_txn.open_table(LISTINGS_TABLE)?;
            let existing = table.get(id.as_bytes())?.map(|v| v.value().to_vec());
            updated = match existing {
                Some(bytes) => {
                    let mut listing = decode_listing(&bytes)?;
                    listing.apply_update(update);
                    let bytes = encode_listing(&listing)?;
                    table.insert(id.as_bytes(), bytes.as_slice())?;
                    true
                }
                None => false,
            };
        }
        write_txn.commit().map_err(StorageError::from)?;

        if updated {
            debug!(id = %id, "Listing updated");
        }
        Ok(updated)
    }

    fn increment_view_count(&self, id: ListingId) -> Result<Option<Listing>> {
        let write_txn = self.begin_write()?;
        let listing;
        {
            let mut table = write_txn.open_table(LISTINGS_TABLE)?;
            let existing = table.get(id.as_bytes())?.map(|v| v.value().to_vec());
            listing = match existing {
                Some(bytes) => {
                    let mut listing = decode_listing(&bytes)?;
                    listing.view_count = listing.view_count.saturating_add(1);
                    let bytes = encode_listing(&listing)?;
                    table.insert(id.as_bytes(), bytes.as_slice())?;
                    Some(listing)
                }
                None => None,
            };
        }
        write_txn.commit().map_err(StorageError::from)?;

        Ok(listing)
    }

    fn delete_listing(&self, id: ListingId) -> Result<bool> {
        let write_txn = self.begin_write()?;
        let existed;
        {
            let mut table = write_txn.open_table(LISTINGS_TABLE)?;
            existed = table.remove(id.as_bytes())?.is_some();
        }
        write_txn.commit().map_err(StorageError::from)?;

        if existed {
            debug!(id = %id, "Listing deleted");
        }
        Ok(existed)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    fn add_favorite(&self, user: &UserId, id: ListingId) -> Result<bool> {
        let write_txn = self.begin_write()?;
        let already_present;
        {
            let listings = write_txn.open_table(LISTINGS_TABLE)?;
            if listings.get(id.as_bytes())?.is_none() {
                return Err(NotFoundError::listing(id).into());
            }

            let mut table = write_txn.open_multimap_table(FAVORITES_TABLE)?;
            already_present = table.insert(user.as_str(), id.as_bytes())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        if !already_present {
            debug!(user = %user, id = %id, "Favorite added");
        }
        Ok(!already_present)
    }

    fn remove_favorite(&self, user: &UserId, id: ListingId) -> Result<bool> {
        let write_txn = self.begin_write()?;
        let existed;
        {
            let mut table = write_txn.open_multimap_table(FAVORITES_TABLE)?;
            existed = table.remove(user.as_str(), id.as_bytes())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        if existed {
            debug!(user = %user, id = %id, "Favorite removed");
        }
        Ok(existed)
    }

    fn list_favorite_ids(&self, user: &UserId) -> Result<Vec<ListingId>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_multimap_table(FAVORITES_TABLE)?;

        let mut ids = Vec::new();
        for result in table.get(user.as_str())? {
            let value = result.map_err(StorageError::from)?;
            ids.push(ListingId::from_bytes(*value.value()));
        }

        Ok(ids)
    }

    fn is_favorite(&self, user: &UserId, id: ListingId) -> Result<bool> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_multimap_table(FAVORITES_TABLE)?;

        for result in table.get(user.as_str())? {
            let value = result.map_err(StorageError::from)?;
            if value.value() == id.as_bytes() {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

// RedbStorage is auto Send + Sync: Database, DatabaseMetadata, PathBuf and
// SyncMode are all Send + Sync.
