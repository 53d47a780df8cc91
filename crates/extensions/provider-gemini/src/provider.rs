//! Gemini generation client.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use webtailor_protocols::error::GenerationError;
use webtailor_protocols::provider::GenerationClient;

use crate::client::{GeminiClient, BASE_URL};
use crate::types::*;

/// [`GenerationClient`] over the Gemini `generateContent` API.
///
/// The API key can be installed after construction, so a client can exist
/// before the user has configured one.
pub struct GeminiProvider {
    client: GeminiClient,
    model: String,
    api_key: RwLock<Option<String>>,
    sampling: GenerationConfig,
}

impl GeminiProvider {
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash-lite";

    /// Create a provider against the public endpoint.
    pub fn new(model: impl Into<String>) -> Result<Self, GenerationError> {
        Self::with_endpoint(BASE_URL, model, Duration::from_secs(60))
    }

    /// Create a provider against a custom `.../models` endpoint.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            client: GeminiClient::new(endpoint, timeout)?,
            model: model.into(),
            api_key: RwLock::new(None),
            sampling: GenerationConfig::default(),
        })
    }

    pub fn with_api_key(self, api_key: Option<String>) -> Self {
        *self.api_key.write() = api_key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_sampling(mut self, sampling: GenerationConfig) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: Some(self.sampling.clone()),
        }
    }
}

/// Pull the answer text out of a response, classifying refusals.
fn extract_text(response: &GenerateContentResponse) -> Result<String, GenerationError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        warn!("Gemini blocked the prompt: {}", reason);
        return Err(GenerationError::Blocked(reason.to_string()));
    }

    response
        .first_text()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| GenerationError::MalformedResponse("no text in first candidate".to_string()))
}

#[async_trait]
impl GenerationClient for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .read()
            .clone()
            .ok_or(GenerationError::MissingApiKey)?;

        debug!("Gemini generate: model={}, prompt_chars={}", self.model, prompt.len());
        let response = self
            .client
            .generate_content(&self.model, &api_key, &self.build_request(prompt))
            .await?;
        extract_text(&response)
    }

    fn has_credentials(&self) -> bool {
        self.api_key.read().is_some()
    }

    fn set_credentials(&self, api_key: String) {
        *self.api_key.write() = Some(api_key).filter(|k| !k.is_empty());
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
