//! Gemini API client.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use webtailor_protocols::error::GenerationError;

use crate::types::*;

/// Default models endpoint.
pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
}

impl GeminiClient {
    /// Create a client for `endpoint` (the `.../models` collection URL).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate content (non-streaming).
    pub async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let url = format!("{}/{}:generateContent", self.endpoint, model);

        debug!("Gemini generate_content: model={}", model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !status.is_success() {
            let error: Result<GeminiError, _> = serde_json::from_str(&body);
            return match error {
                Ok(e) => Err(GenerationError::from_api_response(status.as_u16(), e.error.message)),
                Err(_) => Err(GenerationError::from_api_response(status.as_u16(), body)),
            };
        }

        serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedResponse(format!("Failed to parse response: {}", e)))
    }
}
