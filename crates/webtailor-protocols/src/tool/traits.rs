//! Tool trait definition.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{ToolDefinition, ToolOutput};
use crate::error::ToolError;

/// Core trait for tools.
///
/// Tools are executable units that plans invoke to change the page.
/// Parameter validation is each tool's own responsibility; the registry
/// dispatches without inspecting parameters.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition.
    fn definition(&self) -> &ToolDefinition;

    /// Execute the tool with the given parameters.
    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError>;
}

/// Deserialize tool parameters, mapping failures to [`ToolError::InvalidParameters`].
pub fn parse_params<T: DeserializeOwned>(params: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}
