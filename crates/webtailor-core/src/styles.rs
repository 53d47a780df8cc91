//! Session-scoped record of injected stylesheet fragments.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashSet, VecDeque};
use std::hash::{Hash, Hasher};

use parking_lot::Mutex;

#[derive(Default)]
struct Inner {
    keys: HashSet<String>,
    order: VecDeque<String>,
}

/// Keys of the stylesheet fragments injected in the current document session.
///
/// Never persisted; cleared only by a full reset.
#[derive(Default)]
pub struct AppliedStyleSet {
    inner: Mutex<Inner>,
}

impl AppliedStyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable key for a fragment without a description.
    pub fn fingerprint(css: &str) -> String {
        let mut hasher = DefaultHasher::new();
        css.trim().hash(&mut hasher);
        format!("css-{:016x}", hasher.finish())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().keys.contains(key)
    }

    /// Record `key`. Returns `false` if it was already present.
    pub fn insert(&self, key: impl Into<String>) -> bool {
        let key = key.into();
        let mut inner = self.inner.lock();
        if !inner.keys.insert(key.clone()) {
            return false;
        }
        inner.order.push_back(key);
        true
    }

    /// The `n` most recently inserted keys, newest last.
    pub fn recent(&self, n: usize) -> Vec<String> {
        let inner = self.inner.lock();
        let skip = inner.order.len().saturating_sub(n);
        inner.order.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.keys.clear();
        inner.order.clear();
    }
}
