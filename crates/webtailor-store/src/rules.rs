//! Per-origin rule store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use webtailor_protocols::error::PersistenceError;
use webtailor_protocols::persistence::{DOMAIN_RULES_KEY, KeyValueStore};
use webtailor_protocols::rule::Rule;

/// Rules kept per origin unless configured otherwise.
pub const DEFAULT_MAX_RULES: usize = 10;

type RuleMap = BTreeMap<String, Vec<Rule>>;

/// In-memory mirror of the `domainRules` value.
#[derive(Default)]
struct Mirror {
    /// Set once the backend has been read successfully.
    loaded: bool,
    rules: RuleMap,
    /// Stored entries that did not decode, keyed by origin. An array holds
    /// the undecodable rules of an otherwise readable list; anything else is
    /// the origin's whole stored value. Written back untouched.
    opaque: BTreeMap<String, Value>,
}

impl Mirror {
    fn decode(stored: Option<Value>) -> Self {
        let mut mirror = Mirror {
            loaded: true,
            ..Mirror::default()
        };
        let map = match stored {
            Some(Value::Object(map)) => map,
            Some(other) => {
                warn!("Ignoring non-object {} value: {}", DOMAIN_RULES_KEY, other);
                return mirror;
            }
            None => return mirror,
        };

        for (origin, value) in map {
            let Value::Array(items) = value else {
                warn!(%origin, "Keeping undecodable stored rules as-is");
                mirror.opaque.insert(origin, value);
                continue;
            };

            let mut rules = Vec::with_capacity(items.len());
            let mut undecodable = Vec::new();
            for item in items {
                match serde_json::from_value::<Rule>(item.clone()) {
                    Ok(rule) => rules.push(rule),
                    Err(e) => {
                        warn!(%origin, error = %e, "Skipping undecodable stored rule");
                        undecodable.push(item);
                    }
                }
            }
            if !undecodable.is_empty() {
                mirror.opaque.insert(origin.clone(), Value::Array(undecodable));
            }
            if !rules.is_empty() {
                mirror.rules.insert(origin, rules);
            }
        }
        mirror
    }

    fn encode(&self) -> Result<Value, PersistenceError> {
        let mut map = serde_json::Map::new();
        for (origin, value) in &self.opaque {
            map.insert(origin.clone(), value.clone());
        }
        for (origin, rules) in &self.rules {
            let mut items = Vec::with_capacity(rules.len());
            for rule in rules {
                items.push(serde_json::to_value(rule)?);
            }
            if let Some(Value::Array(undecodable)) = self.opaque.get(origin) {
                items.extend(undecodable.iter().cloned());
            }
            map.insert(origin.clone(), Value::Array(items));
        }
        Ok(Value::Object(map))
    }
}

/// Origin key -> rules mapping, mirrored to a [`KeyValueStore`].
///
/// Every mutation rewrites the whole mapping under `domainRules` while
/// holding the store lock, so concurrent saves cannot lose each other's
/// writes. A mutation on a store whose backend has not been read yet reads
/// it first and fails if that read fails, so stored rules of other origins
/// are never overwritten by a partial view. Stored rules that do not decode
/// are skipped for replay but written back unchanged. When a write fails the
/// in-memory mapping stays authoritative for the rest of the session.
pub struct RuleStore {
    backend: Arc<dyn KeyValueStore>,
    max_rules: usize,
    mirror: Mutex<Mirror>,
}

impl RuleStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_max_rules(backend, DEFAULT_MAX_RULES)
    }

    pub fn with_max_rules(backend: Arc<dyn KeyValueStore>, max_rules: usize) -> Self {
        Self {
            backend,
            max_rules: max_rules.max(1),
            mirror: Mutex::new(Mirror::default()),
        }
    }

    pub fn max_rules(&self) -> usize {
        self.max_rules
    }

    async fn read_backend(&self) -> Result<Mirror, PersistenceError> {
        let mut stored = self.backend.get(&[DOMAIN_RULES_KEY]).await?;
        Ok(Mirror::decode(stored.remove(DOMAIN_RULES_KEY)))
    }

    /// Replace the in-memory mapping with the persisted one.
    ///
    /// Rules that cannot be decoded are skipped. Returns the number of
    /// origins with loaded rules.
    pub async fn hydrate(&self) -> Result<usize, PersistenceError> {
        let mut mirror = self.mirror.lock().await;
        *mirror = self.read_backend().await?;
        let count = mirror.rules.len();
        info!("Loaded stored rules for {} origins", count);
        Ok(count)
    }

    async fn ensure_loaded(&self, mirror: &mut Mirror) -> Result<(), PersistenceError> {
        if !mirror.loaded {
            debug!("Reading stored rules before first write");
            *mirror = self.read_backend().await?;
        }
        Ok(())
    }

    /// Rules stored for `origin`, newest first after any eviction pass.
    pub async fn load(&self, origin: &str) -> Vec<Rule> {
        self.mirror
            .lock()
            .await
            .rules
            .get(origin)
            .cloned()
            .unwrap_or_default()
    }

    /// Origins that currently have rules.
    pub async fn origins(&self) -> Vec<String> {
        self.mirror.lock().await.rules.keys().cloned().collect()
    }

    /// Append `rule` for `origin`, evict beyond the cap and persist.
    pub async fn save(&self, origin: &str, rule: Rule) -> Result<(), PersistenceError> {
        let mut mirror = self.mirror.lock().await;
        self.ensure_loaded(&mut mirror).await?;

        if mirror.opaque.get(origin).is_some_and(|v| !v.is_array()) {
            mirror.opaque.remove(origin);
        }
        let list = mirror.rules.entry(origin.to_string()).or_default();
        list.push(rule);
        if list.len() > self.max_rules {
            list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let evicted = list.len() - self.max_rules;
            list.truncate(self.max_rules);
            debug!(%origin, evicted, "Evicted oldest rules");
        }
        let count = list.len();

        self.persist(&mirror).await?;
        info!(%origin, count, "Saved rule");
        Ok(())
    }

    /// Remove every rule for `origin` and persist.
    pub async fn clear(&self, origin: &str) -> Result<(), PersistenceError> {
        let mut mirror = self.mirror.lock().await;
        self.ensure_loaded(&mut mirror).await?;

        let had_rules = mirror.rules.remove(origin).is_some();
        let had_opaque = mirror.opaque.remove(origin).is_some();
        if !had_rules && !had_opaque {
            return Ok(());
        }
        self.persist(&mirror).await?;
        info!(%origin, "Cleared rules");
        Ok(())
    }

    async fn persist(&self, mirror: &Mirror) -> Result<(), PersistenceError> {
        let entries = HashMap::from([(DOMAIN_RULES_KEY.to_string(), mirror.encode()?)]);
        self.backend.set(entries).await
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
