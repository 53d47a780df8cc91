//! Durable key-value persistence boundary.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::PersistenceError;

/// Key holding the origin -> rule list mapping.
pub const DOMAIN_RULES_KEY: &str = "domainRules";

/// Key holding the generation service credential.
pub const API_KEY_KEY: &str = "apiKey";

/// Key holding the free-text global prompt.
pub const GLOBAL_PROMPT_KEY: &str = "globalPromptText";

/// Key-value store, assumed eventually durable across restarts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the given keys. Missing keys are absent from the result.
    async fn get(
        &self,
        keys: &[&str],
    ) -> Result<HashMap<String, serde_json::Value>, PersistenceError>;

    /// Write every entry. Either all entries land or the call fails.
    async fn set(&self, entries: HashMap<String, serde_json::Value>) -> Result<(), PersistenceError>;
}
