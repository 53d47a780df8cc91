//! Error types for the webtailor protocol layer.

mod command;
mod document;
mod generation;
mod persistence;
mod plan;
mod tool;

pub use command::*;
pub use document::*;
pub use generation::*;
pub use persistence::*;
pub use plan::*;
pub use tool::*;
