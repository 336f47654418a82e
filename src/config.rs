//! Configuration types for SwapShelf.
//!
//! The [`Config`] struct controls marketplace behavior including:
//! - Cache size and durability settings for the listing store
//! - Which text generation provider backs listing-form assistance
//! - How long a text generation call may take before it is abandoned
//!
//! # Example
//! ```rust
//! use swapshelf::{Config, SyncMode};
//!
//! // Use defaults (text generation disabled)
//! let config = Config::default();
//!
//! // Customize for production
//! let config = Config {
//!     cache_size_mb: 128,
//!     sync_mode: SyncMode::Paranoid,
//!     ..Default::default()
//! };
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default model used by the Gemini provider.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Marketplace configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings.
#[derive(Clone, Debug)]
pub struct Config {
    /// Cache size in megabytes for the storage engine.
    ///
    /// Default: 64 MB
    pub cache_size_mb: usize,

    /// Durability mode for write operations.
    pub sync_mode: SyncMode,

    /// Which service generates listing descriptions and suggestions.
    pub text_generation: TextGenerationProvider,

    /// Upper bound on a single text generation call.
    ///
    /// Default: 30 seconds
    pub generation_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size_mb: 64,
            sync_mode: SyncMode::Normal,
            // Disabled needs no network or credentials
            text_generation: TextGenerationProvider::Disabled,
            generation_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Config that uses the Gemini API for text generation.
    ///
    /// Requires the `gemini` feature at runtime; without it, opening a
    /// marketplace with this config fails.
    ///
    /// # Example
    /// ```rust
    /// use swapshelf::Config;
    ///
    /// let config = Config::with_gemini("my-api-key");
    /// assert!(config.text_generation.is_gemini());
    /// ```
    pub fn with_gemini(api_key: impl Into<String>) -> Self {
        Self {
            text_generation: TextGenerationProvider::Gemini {
                endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                api_key: api_key.into(),
            },
            ..Default::default()
        }
    }

    /// Validates the configuration.
    ///
    /// Called automatically by `Marketplace::open()`.
    ///
    /// # Errors
    /// Returns `ValidationError` if:
    /// - `cache_size_mb` is 0
    /// - `generation_timeout` is zero
    /// - the Gemini provider has an empty API key, empty model, or a
    ///   non-http(s) endpoint
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cache_size_mb == 0 {
            return Err(ValidationError::invalid_field(
                "cache_size_mb",
                "must be greater than 0",
            ));
        }

        if self.generation_timeout.is_zero() {
            return Err(ValidationError::invalid_field(
                "generation_timeout",
                "must be greater than 0",
            ));
        }

        if let TextGenerationProvider::Gemini {
            endpoint,
            model,
            api_key,
        } = &self.text_generation
        {
            if api_key.trim().is_empty() {
                return Err(ValidationError::required_field("text_generation.api_key"));
            }
            if model.trim().is_empty() {
                return Err(ValidationError::required_field("text_generation.model"));
            }
            let endpoint = endpoint.trim();
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ValidationError::invalid_field(
                    "text_generation.endpoint",
                    format!("must start with http:// or https://, got '{}'", endpoint),
                ));
            }
        }

        Ok(())
    }
}

/// Text generation provider configuration.
#[derive(Clone)]
pub enum TextGenerationProvider {
    /// No text generation; every request fails with a generation error.
    Disabled,

    /// Google Gemini `generateContent` REST API.
    Gemini {
        /// Base URL, e.g. `https://generativelanguage.googleapis.com`.
        endpoint: String,
        /// Model name, e.g. `gemini-1.5-flash`.
        model: String,
        /// API key sent as the `key` query parameter.
        api_key: String,
    },
}

impl TextGenerationProvider {
    /// Returns true if text generation is disabled.
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Returns true if this is the Gemini provider.
    pub fn is_gemini(&self) -> bool {
        matches!(self, Self::Gemini { .. })
    }
}

// The API key must never reach logs through `?config`.
impl std::fmt::Debug for TextGenerationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Gemini {
                endpoint, model, ..
            } => f
                .debug_struct("Gemini")
                .field("endpoint", endpoint)
                .field("model", model)
                .field("api_key", &"<redacted>")
                .finish(),
        }
    }
}

/// Durability mode for write operations.
///
/// Controls the trade-off between write performance and crash safety.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// Sync to disk on transaction commit.
    #[default]
    Normal,

    /// Async sync (faster writes, may lose recent data on crash).
    Fast,

    /// Sync every write operation (slowest, maximum durability).
    Paranoid,
}

impl SyncMode {
    /// Returns true if this mode syncs on every write.
    pub fn is_paranoid(&self) -> bool {
        matches!(self, Self::Paranoid)
    }

    /// Returns true if this mode is async (may lose data on crash).
    pub fn is_fast(&self) -> bool {
        matches!(self, Self::Fast)
    }

    /// Maps the mode onto redb's commit durability.
    pub(crate) fn durability(&self) -> redb::Durability {
        match self {
            Self::Normal => redb::Durability::Immediate,
            Self::Fast => redb::Durability::Eventual,
            Self::Paranoid => redb::Durability::Immediate,
        }
    }

    /// Whether commits go through redb's two-phase commit.
    pub(crate) fn two_phase_commit(&self) -> bool {
        self.is_paranoid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_mode_commit_settings() {
        assert!(matches!(
            SyncMode::Normal.durability(),
            redb::Durability::Immediate
        ));
        assert!(matches!(
            SyncMode::Fast.durability(),
            redb::Durability::Eventual
        ));
        assert!(matches!(
            SyncMode::Paranoid.durability(),
            redb::Durability::Immediate
        ));
        assert!(SyncMode::Paranoid.two_phase_commit());
        assert!(!SyncMode::Normal.two_phase_commit());
        assert!(!SyncMode::Fast.two_phase_commit());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.text_generation.is_disabled());
        assert_eq!(config.cache_size_mb, 64);
        assert_eq!(config.sync_mode, SyncMode::Normal);
        assert_eq!(config.generation_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_with_gemini() {
        let config = Config::with_gemini("secret");
        assert!(config.text_generation.is_gemini());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_cache_size_zero() {
        let config = Config {
            cache_size_mb: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ValidationError::InvalidField { field, .. } if field == "cache_size_mb")
        );
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = Config {
            generation_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_gemini_empty_key() {
        let config = Config::with_gemini("   ");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ValidationError::RequiredField { .. }));
    }

    #[test]
    fn test_validate_gemini_bad_endpoint() {
        let config = Config {
            text_generation: TextGenerationProvider::Gemini {
                endpoint: "ftp://example.com".to_string(),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                api_key: "secret".to_string(),
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::with_gemini("super-secret-key");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_sync_mode_checks() {
        assert!(!SyncMode::Normal.is_fast());
        assert!(!SyncMode::Normal.is_paranoid());
        assert!(SyncMode::Fast.is_fast());
        assert!(SyncMode::Paranoid.is_paranoid());
    }

    #[test]
    fn test_sync_mode_serialization() {
        let mode = SyncMode::Fast;
        let bytes = bincode::serialize(&mode).unwrap();
        let restored: SyncMode = bincode::deserialize(&bytes).unwrap();
        assert_eq!(mode, restored);
    }
}
