//! Tool execution and dispatch errors.

use thiserror::Error;

use super::{DocumentError, GenerationError};

/// Failure reported by a tool executor.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
}

/// Failure of a registry dispatch.
///
/// Both variants are fatal to the single action being dispatched only.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool {tool} failed: {source}")]
    Execution {
        tool: String,
        #[source]
        source: ToolError,
    },
}

impl DispatchError {
    /// Name of the tool the dispatch was addressed to.
    pub fn tool(&self) -> &str {
        match self {
            Self::UnknownTool(tool) => tool,
            Self::Execution { tool, .. } => tool,
        }
    }
}
