//! Generation service errors.

use thiserror::Error;

/// Failure of a call to the reasoning/generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation API key not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Prompt blocked by generation service: {0}")]
    Blocked(String),

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Build an API error from a non-2xx response, truncating long bodies.
    pub fn from_api_response(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = match message.char_indices().nth(300) {
            Some((idx, _)) => message[..idx].to_string(),
            None => message,
        };
        if status == 401 || status == 403 {
            return Self::Api {
                status,
                message: format!("authentication failed: {}", message),
            };
        }
        Self::Api { status, message }
    }
}
