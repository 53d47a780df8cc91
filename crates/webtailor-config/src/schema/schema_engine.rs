//! Rule cache, mutation watch and storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::home_dir;

/// Rule cache and page context cache limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Rules kept per origin; the oldest are evicted first.
    #[serde(default = "default_max_rules")]
    pub max_rules_per_origin: usize,

    /// Rules older than this are not replayed.
    #[serde(default = "default_staleness_days")]
    pub staleness_days: u32,

    /// Lifetime of a page context snapshot.
    #[serde(default = "default_context_ttl_ms")]
    pub context_ttl_ms: u64,
}

fn default_max_rules() -> usize {
    10
}

fn default_staleness_days() -> u32 {
    30
}

fn default_context_ttl_ms() -> u64 {
    15_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_rules_per_origin: default_max_rules(),
            staleness_days: default_staleness_days(),
            context_ttl_ms: default_context_ttl_ms(),
        }
    }
}

/// Mutation watch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet period after the last significant mutation before replaying.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_significant_tags")]
    pub significant_tags: Vec<String>,

    #[serde(default = "default_significant_classes")]
    pub significant_classes: Vec<String>,

    #[serde(default = "default_significant_ids")]
    pub significant_ids: Vec<String>,
}

fn default_debounce_ms() -> u64 {
    2_500
}

fn default_significant_tags() -> Vec<String> {
    ["article", "section", "main"].map(String::from).to_vec()
}

fn default_significant_classes() -> Vec<String> {
    ["content", "post", "comments"].map(String::from).to_vec()
}

fn default_significant_ids() -> Vec<String> {
    vec!["comments".to_string()]
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            significant_tags: default_significant_tags(),
            significant_classes: default_significant_classes(),
            significant_ids: default_significant_ids(),
        }
    }
}

/// Key-value storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    home_dir().join("storage.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}
