//! Gemini text-generation client (generateContent API).

use crate::generation::GenerationError;
use crate::llm::TextGenerator;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Request timeout; generation calls can be slow.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Client for Google's Gemini generateContent API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Creates a client with an explicit (possibly absent) API key.
    pub fn new(api_key: Option<String>, model: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Creates a client from the `GEMINI_API_KEY` environment variable.
    ///
    /// A missing key is not an error here: it surfaces as
    /// [`GenerationError::MissingCredential`] on the first call, before any
    /// network attempt is made.
    pub fn from_env(model: &str) -> Self {
        Self::new(std::env::var(GEMINI_API_KEY_VAR).ok(), model)
    }

    /// Overrides the API base URL (for tests against a local server).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// The model this client generates with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether a credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, key
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredential)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!("Sending generateContent request to model {}", self.model);

        let response = self
            .client
            .post(self.endpoint(key))
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport {
                status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            // The API reports failures as {"error": {"message": ...}}.
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error.map(|e| e.message))
                .unwrap_or_else(|| "Unknown error".to_string());
            warn!("Gemini call failed with status {}: {}", status, message);
            return Err(GenerationError::Transport {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse =
            response.json().await.map_err(|e| GenerationError::Transport {
                status: status.as_u16(),
                message: e.to_string(),
            })?;

        let text = body.extract_text();
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        debug!("Received {} bytes of generated text", text.len());
        Ok(text)
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, empty when absent.
    fn extract_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn test_blank_key_counts_as_missing() {
        let client = GeminiClient::new(Some("   ".to_string()), config::DEFAULT_MODEL);
        assert!(!client.has_credential());

        let client = GeminiClient::new(Some("abc123".to_string()), config::DEFAULT_MODEL);
        assert!(client.has_credential());
    }

    #[test]
    fn test_endpoint_shape() {
        let client = GeminiClient::new(Some("k".to_string()), "gemini-2.0-flash")
            .with_base_url("http://localhost:9999/");
        assert_eq!(
            client.endpoint("k"),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent?key=k"
        );
    }

    #[test]
    fn test_missing_credential_short_circuits() {
        let client = GeminiClient::new(None, config::DEFAULT_MODEL);
        // No server exists at the default URL in tests; an attempted call
        // would fail as Transport, so MissingCredential proves we never
        // reached the network.
        let result = tokio_test::block_on(client.complete("prompt"));
        assert_eq!(result, Err(GenerationError::MissingCredential));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "foo"}, {"text": "bar"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.extract_text(), "foobar");
    }

    #[test]
    fn test_extract_text_handles_empty_response() {
        let body: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(body.extract_text(), "");

        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": null}]}"#).unwrap();
        assert_eq!(body.extract_text(), "");
    }
}
