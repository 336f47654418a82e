//! Errors returned by the marketplace.
//!
//! Everything public returns [`SwapShelfError`]. Its variants wrap the
//! detail types [`StorageError`], [`ValidationError`] and [`NotFoundError`],
//! or carry a message for configuration and text generation failures.
//!
//! The catalog query engine has no error path: an unusable filter value is
//! treated as "no constraint", never as a failure.
//!
//! ```rust,no_run
//! use swapshelf::{Config, Marketplace, SwapShelfError};
//!
//! match Marketplace::open("./market.db", Config::default()) {
//!     Ok(market) => drop(market),
//!     Err(e) if e.is_storage() => eprintln!("store unavailable: {e}"),
//!     Err(e) => eprintln!("cannot open: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::types::ListingId;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SwapShelfError>;

/// The error type of every public operation.
#[derive(Debug, Error)]
pub enum SwapShelfError {
    /// The listing store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Caller-supplied data was rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The configuration cannot be used.
    #[error("Configuration error: {reason}")]
    Config {
        /// What is wrong.
        reason: String,
    },

    /// An id did not resolve.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// The text generator failed, timed out or is disabled.
    #[error("Text generation error: {0}")]
    Generation(String),
}

impl SwapShelfError {
    /// Builds a [`SwapShelfError::Config`].
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Builds a [`SwapShelfError::Generation`].
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// True for [`SwapShelfError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True for [`SwapShelfError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// True for [`SwapShelfError::Storage`].
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// True for [`SwapShelfError::Generation`].
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_))
    }
}

/// Failures of the redb-backed listing store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store file exists but its metadata is unreadable.
    #[error("Database corrupted: {0}")]
    Corrupted(String),

    /// Another handle already holds the store file.
    #[error("Database is locked by another writer")]
    DatabaseLocked,

    /// A transaction could not begin or commit.
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// A stored record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Any other redb failure.
    #[error("Storage engine error: {0}")]
    Redb(String),

    /// The store was written by an incompatible schema.
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch {
        /// Version this build understands.
        expected: u32,
        /// Version recorded in the store.
        found: u32,
    },
}

impl StorageError {
    /// Builds a [`StorageError::Corrupted`].
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// Builds a [`StorageError::Serialization`].
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

/// Maps a foreign error onto a `StorageError` variant and lifts it into
/// `SwapShelfError` as well, so `?` works at either level.
macro_rules! storage_error_from {
    ($($source:ty => $variant:ident $(($prefix:literal))?),+ $(,)?) => {
        $(
            impl From<$source> for StorageError {
                fn from(err: $source) -> Self {
                    StorageError::$variant(format!(concat!($($prefix,)? "{}"), err))
                }
            }

            impl From<$source> for SwapShelfError {
                fn from(err: $source) -> Self {
                    SwapShelfError::Storage(StorageError::from(err))
                }
            }
        )+
    };
}

storage_error_from! {
    redb::Error => Redb,
    redb::DatabaseError => Redb,
    redb::TransactionError => Transaction,
    redb::CommitError => Transaction("Commit failed: "),
    redb::TableError => Redb("Table error: "),
    redb::StorageError => Redb("Storage error: "),
    bincode::Error => Serialization,
}

/// Rejected listing or configuration input.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The value is present but not acceptable.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Field name.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A text field is longer than allowed.
    #[error("Content too large in '{field}': {size} chars (max: {max} chars)")]
    ContentTooLarge {
        /// Field name.
        field: String,
        /// Length in chars.
        size: usize,
        /// Limit in chars.
        max: usize,
    },

    /// A mandatory field is missing or blank.
    #[error("Required field missing: {field}")]
    RequiredField {
        /// Field name.
        field: String,
    },

    /// A list field has too many entries.
    #[error("Too many items in '{field}': {count} (max: {max})")]
    TooManyItems {
        /// Field name.
        field: String,
        /// Entries given.
        count: usize,
        /// Limit.
        max: usize,
    },
}

impl ValidationError {
    /// Builds a [`ValidationError::InvalidField`].
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`ValidationError::ContentTooLarge`].
    pub fn content_too_large(field: impl Into<String>, size: usize, max: usize) -> Self {
        Self::ContentTooLarge {
            field: field.into(),
            size,
            max,
        }
    }

    /// Builds a [`ValidationError::RequiredField`].
    pub fn required_field(field: impl Into<String>) -> Self {
        Self::RequiredField {
            field: field.into(),
        }
    }

    /// Builds a [`ValidationError::TooManyItems`].
    pub fn too_many_items(field: impl Into<String>, count: usize, max: usize) -> Self {
        Self::TooManyItems {
            field: field.into(),
            count,
            max,
        }
    }
}

/// An id that did not resolve to a stored entity.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// No listing with this id.
    #[error("Listing not found: {0}")]
    Listing(ListingId),
}

impl NotFoundError {
    /// Builds a [`NotFoundError::Listing`].
    pub fn listing(id: ListingId) -> Self {
        Self::Listing(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = SwapShelfError::config("cache_size_mb must be positive");
        assert_eq!(
            err.to_string(),
            "Configuration error: cache_size_mb must be positive"
        );
    }

    #[test]
    fn test_schema_mismatch_message() {
        let err = StorageError::SchemaVersionMismatch {
            expected: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Schema version mismatch: expected 2, found 1"
        );
    }

    #[test]
    fn test_too_many_items_message() {
        let err = ValidationError::too_many_items("images", 6, 5);
        assert_eq!(err.to_string(), "Too many items in 'images': 6 (max: 5)");
    }

    #[test]
    fn test_listing_not_found_carries_id() {
        let id = ListingId::new();
        let err: SwapShelfError = NotFoundError::listing(id).into();
        assert!(err.is_not_found());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), format!("Listing not found: {}", id));
        assert!(matches!(err, SwapShelfError::NotFound(NotFoundError::Listing(got)) if got == id));
    }

    #[test]
    fn test_generation_error() {
        let err = SwapShelfError::generation("service unavailable");
        assert_eq!(err.to_string(), "Text generation error: service unavailable");
        assert!(err.is_generation());
        assert!(!err.is_storage());
    }

    #[test]
    fn test_commit_error_is_transaction() {
        let err = StorageError::from(redb::CommitError::Storage(redb::StorageError::Corrupted(
            "torn page".into(),
        )));
        assert!(matches!(&err, StorageError::Transaction(msg) if msg.starts_with("Commit failed: ")));
    }

    #[test]
    fn test_bincode_error_lifts_to_storage() {
        let bad: std::result::Result<u64, bincode::Error> = bincode::deserialize(&[1u8]);
        let err: SwapShelfError = bad.unwrap_err().into();
        assert!(matches!(
            err,
            SwapShelfError::Storage(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_question_mark_lifts_storage_error() {
        fn inner() -> Result<()> {
            Err(StorageError::corrupted("metadata missing"))?
        }

        assert!(inner().unwrap_err().is_storage());
    }
}
