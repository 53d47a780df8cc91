//! Tool registry.

mod base;
mod error;
mod tool;

pub use base::{BaseRegistry, Registerable};
pub use error::RegistryError;
pub use tool::{ToolFuture, ToolRegistry};
