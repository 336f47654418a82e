//! Gemini REST provider.
//!
//! Minimal, non-streaming client for the `generateContent` endpoint:
//! - POST {endpoint}/v1beta/models/{model}:generateContent?key={api_key}
//!
//! The system prompt and user prompt are sent as a single text part.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{GenerationRequest, TextGenerator};
use crate::error::{Result, SwapShelfError};

/// Text returned when the response carries no candidate text.
pub const EMPTY_RESPONSE_TEXT: &str = "No response generated";

/// Longest response body excerpt kept in error messages.
const SNIPPET_MAX_CHARS: usize = 300;

/// Gemini-backed [`TextGenerator`].
///
/// Keeps a preconfigured `reqwest::Client` with the request timeout.
pub struct GeminiGenerator {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiGenerator {
    /// Creates a generator for `model` at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `SwapShelfError::Config` if the API key is blank or the
    /// endpoint is not http(s), and `SwapShelfError::Generation` if the
    /// HTTP client cannot be built.
    pub fn new(endpoint: &str, model: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(SwapShelfError::config("Gemini API key not configured"));
        }

        let endpoint = endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(SwapShelfError::config(format!(
                "Gemini endpoint must start with http:// or https://, got '{}'",
                endpoint
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SwapShelfError::generation(format!("HTTP client error: {}", e)))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            endpoint.trim_end_matches('/'),
            model.trim()
        );

        info!(
            model = %model,
            endpoint = %endpoint,
            timeout_ms = timeout.as_millis() as u64,
            "GeminiGenerator initialized"
        );

        Ok(Self {
            client,
            url,
            api_key: api_key.trim().to_string(),
            model: model.trim().to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let started = Instant::now();
        let body = GenerateContentRequest::new(request.full_prompt());

        debug!(
            model = %self.model,
            mode = %request.mode,
            prompt_len = request.prompt.len(),
            "POST {}", self.url
        );

        let resp = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| SwapShelfError::generation(format!("Gemini request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            warn!(
                %status,
                %snippet,
                model = %self.model,
                latency_ms = started.elapsed().as_millis() as u64,
                "Gemini generateContent returned non-success status"
            );

            return Err(SwapShelfError::generation(format!(
                "Gemini API error ({}): {}",
                status, snippet
            )));
        }

        let out: GenerateContentResponse = resp.json().await.map_err(|e| {
            SwapShelfError::generation(format!("Failed to decode Gemini response: {}", e))
        })?;

        info!(
            model = %self.model,
            mode = %request.mode,
            latency_ms = started.elapsed().as_millis() as u64,
            "Text generation completed"
        );

        Ok(out.into_text())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

fn make_snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SNIPPET_MAX_CHARS {
        return trimmed.to_string();
    }
    let mut snippet: String = trimmed.chars().take(SNIPPET_MAX_CHARS).collect();
    snippet.push('…');
    snippet
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn new(text: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(text) }],
            }],
            generation_config: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 500,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, or [`EMPTY_RESPONSE_TEXT`].
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| EMPTY_RESPONSE_TEXT.to_string())
    }
}
