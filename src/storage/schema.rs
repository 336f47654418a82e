//! Database schema definitions and versioning.
//!
//! This module defines the table structure for the redb storage engine.
//! All table definitions are compile-time constants.
//!
//! # Schema Versioning
//!
//! The schema version is stored in the metadata table. Opening a database
//! written with a different version fails with
//! `StorageError::SchemaVersionMismatch`.
//!
//! # Table Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ METADATA_TABLE                                               │
//! │   Key: &str                                                  │
//! │   Value: &[u8] (bincode)                                     │
//! │   Entries: "db_metadata" -> DatabaseMetadata                 │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ LISTINGS_TABLE                                               │
//! │   Key: &[u8; 16] (ListingId as UUID bytes)                  │
//! │   Value: &[u8] (bincode-serialized Listing)                 │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ FAVORITES_TABLE (multimap)                                   │
//! │   Key: &str (UserId)                                         │
//! │   Values: &[u8; 16] (ListingId bytes)                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use redb::{MultimapTableDefinition, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Current schema version.
///
/// Increment this when making breaking changes to the schema.
pub const SCHEMA_VERSION: u32 = 1;

/// Maximum listing title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum listing description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 5_000;

/// Maximum length of category, size and location labels.
pub const MAX_FIELD_LENGTH: usize = 100;

/// Maximum number of tags per listing.
pub const MAX_TAGS: usize = 20;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 50;

/// Maximum number of images per listing.
pub const MAX_IMAGES: usize = 5;

/// Key of the [`DatabaseMetadata`] entry in [`METADATA_TABLE`].
pub const METADATA_KEY: &str = "db_metadata";

// ============================================================================
// Table Definitions
// ============================================================================

/// Metadata table for database-level information.
pub const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

/// Listings table.
///
/// Key: ListingId as 16-byte UUID
/// Value: bincode-serialized Listing struct
pub const LISTINGS_TABLE: TableDefinition<&[u8; 16], &[u8]> = TableDefinition::new("listings");

/// Favorites index: user id to saved listing ids.
///
/// A multimap makes adding the same pair twice a no-op.
pub const FAVORITES_TABLE: MultimapTableDefinition<&str, &[u8; 16]> =
    MultimapTableDefinition::new("favorites");

// ============================================================================
// Database Metadata
// ============================================================================

/// Database metadata stored in the metadata table under [`METADATA_KEY`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseMetadata {
    /// Schema version for compatibility checking.
    pub schema_version: u32,

    /// Timestamp when the database was created.
    pub created_at: Timestamp,

    /// Last time the database was opened (updated on each open).
    pub last_opened_at: Timestamp,
}

impl DatabaseMetadata {
    /// Creates new metadata for a fresh database.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            schema_version: SCHEMA_VERSION,
            created_at: now,
            last_opened_at: now,
        }
    }

    /// Updates the last_opened_at timestamp.
    pub fn touch(&mut self) {
        self.last_opened_at = Timestamp::now();
    }

    /// Checks if this metadata is compatible with the current schema.
    pub fn is_compatible(&self) -> bool {
        self.schema_version == SCHEMA_VERSION
    }
}

impl Default for DatabaseMetadata {
    fn default() -> Self {
        Self::new()
    }
}
