//! Reasoning/generation service boundary.

use async_trait::async_trait;

use crate::error::GenerationError;

/// Client for the external generation service.
///
/// Given a prompt, returns free-form text. Callers decide whether to treat
/// the text as raw content or as JSON.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Whether a credential is available for calls.
    fn has_credentials(&self) -> bool;

    /// Install or replace the credential used for calls.
    fn set_credentials(&self, api_key: String);
}
