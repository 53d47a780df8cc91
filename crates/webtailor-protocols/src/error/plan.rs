//! Plan parsing errors.

use thiserror::Error;

/// The generation service's planning response was not a valid plan.
#[derive(Debug, Error)]
#[error("Invalid JSON response from generation service: {message}. Response preview: {preview}")]
pub struct PlanParseError {
    pub message: String,
    pub preview: String,
}

impl PlanParseError {
    /// Create a parse error keeping a short preview of the raw response.
    pub fn new(message: impl Into<String>, response: &str) -> Self {
        Self {
            message: message.into(),
            preview: response.chars().take(200).collect(),
        }
    }
}
