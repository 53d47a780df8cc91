//! # webtailor Store
//!
//! Durable state for the customization engine.
//!
//! ## Features
//!
//! - Per-origin rule lists, capped and evicted oldest-first
//! - Read-modify-write of the full rule map under one lock
//! - In-memory and JSON-file key-value backends

pub mod kv;
pub mod rules;

pub use kv::{FileKeyValueStore, MemoryKeyValueStore};
pub use rules::{DEFAULT_MAX_RULES, RuleStore};
