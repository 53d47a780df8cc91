//! Tool protocol definitions.
//!
//! Tools are the only way plans touch the page.

mod definition;
mod output;
mod traits;

pub use definition::*;
pub use output::*;
pub use traits::*;
