//! Generative text service abstractions for SwapShelf.
//!
//! Text generation is advisory: it drafts listing descriptions, suggests a
//! category and tags, and recommends items to swap for. Nothing in the
//! listing repository depends on it, and a failure here never blocks
//! listing creation.
//!
//! # Providers
//!
//! - [`DisabledGenerator`] - Always fails; the default
//! - `GeminiGenerator` - Remote HTTP provider (requires the `gemini` feature)
//!
//! # Implementing a Custom Provider
//!
//! ```rust
//! use async_trait::async_trait;
//! use swapshelf::generate::{GenerationRequest, TextGenerator};
//! use swapshelf::Result;
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl TextGenerator for Canned {
//!     async fn generate(&self, request: &GenerationRequest) -> Result<String> {
//!         Ok(format!("[{}] {}", request.mode, request.prompt))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "canned"
//!     }
//! }
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;
pub mod prompts;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{Config, TextGenerationProvider};
use crate::error::{Result, SwapShelfError};

#[cfg(feature = "gemini")]
pub use gemini::GeminiGenerator;
pub use prompts::{categorize_prompt, describe_prompt, parse_category_suggestion, CategorySuggestion};

/// What the generator is asked to produce.
///
/// Each mode carries a fixed system prompt that is prepended to the
/// caller's prompt. Unknown mode names fall back to
/// [`GenerationMode::Description`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GenerationMode {
    /// A selling description for a listing.
    #[default]
    Description,
    /// A JSON category/type/tags suggestion.
    Categorize,
    /// Complementary items to swap for.
    Recommend,
}

impl GenerationMode {
    /// Wire name (`description`, `categorize`, `recommend`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Categorize => "categorize",
            Self::Recommend => "recommend",
        }
    }

    /// The instruction prepended to the caller's prompt.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::Description => {
                "You are a fashion expert helping users create compelling descriptions for \
                 clothing items in a sustainable fashion marketplace. Write engaging, detailed \
                 descriptions that highlight the item's style, condition, and appeal to \
                 potential swappers."
            }
            Self::Categorize => {
                "You are a clothing categorization expert. Analyze the item details and suggest \
                 the most appropriate category, type, size, and condition. Respond with a JSON \
                 object containing: {\"category\": \"\", \"type\": \"\", \"suggestedTags\": []}"
            }
            Self::Recommend => {
                "You are a personal stylist. Based on the user's style preferences and item \
                 details, suggest complementary clothing items they might want to swap for. Be \
                 specific about styles, colors, and occasions."
            }
        }
    }
}

impl From<&str> for GenerationMode {
    fn from(value: &str) -> Self {
        match value.trim() {
            "categorize" => Self::Categorize,
            "recommend" => Self::Recommend,
            _ => Self::Description,
        }
    }
}

impl From<String> for GenerationMode {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<GenerationMode> for String {
    fn from(mode: GenerationMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generation call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// User-supplied prompt, appended after the system prompt.
    pub prompt: String,

    /// Generation mode.
    #[serde(default, alias = "type")]
    pub mode: GenerationMode,
}

impl GenerationRequest {
    /// Creates a request.
    pub fn new(prompt: impl Into<String>, mode: GenerationMode) -> Self {
        Self {
            prompt: prompt.into(),
            mode,
        }
    }

    /// The full text sent to the model: system prompt, blank line, prompt.
    pub fn full_prompt(&self) -> String {
        format!("{}\n\n{}", self.mode.system_prompt(), self.prompt)
    }
}

/// Generative text service.
///
/// Implementations must be thread-safe (`Send + Sync`) so one generator can
/// serve concurrent requests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produces text for the request.
    ///
    /// # Errors
    ///
    /// Returns `SwapShelfError::Generation` if the backend is unavailable,
    /// rejects the request, or returns a malformed response.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Short provider name for logs.
    fn name(&self) -> &str;
}

/// Provider used when text generation is not configured.
///
/// # Example
///
/// ```rust
/// use swapshelf::generate::{DisabledGenerator, TextGenerator};
///
/// assert_eq!(DisabledGenerator.name(), "disabled");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Err(SwapShelfError::generation(
            "Text generation is disabled: no provider configured",
        ))
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Creates a text generator based on the configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Gemini requested but the `gemini` feature is not enabled
/// - The HTTP client cannot be built
pub fn create_text_generator(config: &Config) -> Result<Box<dyn TextGenerator>> {
    match &config.text_generation {
        TextGenerationProvider::Disabled => Ok(Box::new(DisabledGenerator)),

        #[cfg(feature = "gemini")]
        TextGenerationProvider::Gemini {
            endpoint,
            model,
            api_key,
        } => Ok(Box::new(GeminiGenerator::new(
            endpoint,
            model,
            api_key,
            config.generation_timeout,
        )?)),

        #[cfg(not(feature = "gemini"))]
        TextGenerationProvider::Gemini { .. } => Err(SwapShelfError::config(
            "Gemini text generation requires the 'gemini' feature",
        )),
    }
}
