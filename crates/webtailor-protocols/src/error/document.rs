//! Document access errors.

use thiserror::Error;

use crate::document::NodeId;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Document unavailable: {0}")]
    Unavailable(String),
}
