//! In-memory document model.
//!
//! A small element tree with just enough CSS selector support for the page
//! tools: type, universal, `#id`, `.class`, attribute (`[a]`, `[a=v]`,
//! `[a*=v]`, `[a^=v]`, `[a$=v]`) and `:nth-of-type(n)` compounds joined by
//! descendant or child combinators, in comma-separated lists.

mod dom_document;
mod dom_node;
mod dom_snapshot;
mod selector;

pub use dom_document::InMemoryDocument;
pub use dom_node::{PageFixture, PageNode};
pub use selector::SelectorList;

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
