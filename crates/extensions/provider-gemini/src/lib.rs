//! # webtailor Provider - Gemini
//!
//! Google Gemini generation client for webtailor.

mod client;
mod provider;
mod types;

pub use client::{GeminiClient, BASE_URL};
pub use provider::GeminiProvider;
pub use types::*;
