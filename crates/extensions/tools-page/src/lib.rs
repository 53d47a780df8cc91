//! Page customization tools for webtailor.
//!
//! Tools mutate a [`Document`](webtailor_protocols::Document) through a
//! shared [`PageSession`]. The generative ones call the generation service
//! and report the stylesheet they produced, which is what lets a plan be
//! frozen into replayable `applyCSS` actions.
//!
//! ## Tools
//!
//! - `applyCSS` - Sanitize and inject a stylesheet block
//! - `generateCSS` - Generate a stylesheet from a description
//! - `hideElements` - Hide elements by selector or natural-language criteria
//! - `transformLayout` - Generate layout CSS for the page structure
//! - `selectElements` - Pick selectors matching natural-language criteria
//! - `modifyText` - Rewrite element text
//! - `summarizeContent` - Summarize selected or main content
//!
//! [`InMemoryDocument`] is a small element tree with a selector engine. It
//! backs the command line and tests, and doubles as a snapshot provider.

pub mod dom;
mod extension;
mod prompts;
pub mod sanitize;
mod selection;
mod session;
mod tools;

pub use dom::{InMemoryDocument, PageFixture, PageNode, SelectorList};
pub use extension::PageToolsExtension;
pub use session::{AppliedCss, PageSession};
pub use tools::*;
