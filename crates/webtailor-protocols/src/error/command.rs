//! Top-level command errors surfaced to the host.

use thiserror::Error;

use super::{DispatchError, DocumentError};

/// Failure of a host-level command.
///
/// Only planning-level and command-level failures reach the host; action
/// failures are reported inside the command result instead.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Generation API key not configured. Set it in the configuration or storage.")]
    MissingApiKey,

    #[error("No command given and no global prompt stored")]
    EmptyCommand,

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Page context unavailable: {0}")]
    Document(#[from] DocumentError),
}
