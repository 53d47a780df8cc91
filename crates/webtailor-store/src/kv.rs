//! Key-value persistence backends.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use webtailor_protocols::error::PersistenceError;
use webtailor_protocols::persistence::KeyValueStore;

type Entries = HashMap<String, serde_json::Value>;

fn select(entries: &Entries, keys: &[&str]) -> Entries {
    keys.iter()
        .filter_map(|key| entries.get(*key).map(|v| (key.to_string(), v.clone())))
        .collect()
}

/// In-memory key-value store for testing and ephemeral sessions.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<Entries>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, keys: &[&str]) -> Result<Entries, PersistenceError> {
        let entries = self.entries.read().await;
        Ok(select(&entries, keys))
    }

    async fn set(&self, entries: Entries) -> Result<(), PersistenceError> {
        self.entries.write().await.extend(entries);
        Ok(())
    }
}

/// Key-value store backed by a single JSON object file.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// original, so a failed write leaves the previous contents intact.
pub struct FileKeyValueStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Open (or lazily create) the store at `path`.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        debug!("FileKeyValueStore initialized at {:?}", path);
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_all(&self) -> Result<Entries, PersistenceError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Entries::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, keys: &[&str]) -> Result<Entries, PersistenceError> {
        let entries = self.read_all().await?;
        Ok(select(&entries, keys))
    }

    async fn set(&self, entries: Entries) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;

        let mut all = self.read_all().await?;
        let keys: Vec<String> = entries.keys().cloned().collect();
        all.extend(entries);

        let content = serde_json::to_string_pretty(&all)?;
        let temp = self.temp_path();
        fs::write(&temp, content).await?;
        fs::rename(&temp, &self.path).await?;

        debug!("Persisted keys {:?} to {:?}", keys, self.path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "kv_tests.rs"]
mod tests;
