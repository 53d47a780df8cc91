//! Time-bounded page context cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

use webtailor_core::AppliedStyleSet;
use webtailor_protocols::error::DocumentError;
use webtailor_protocols::snapshot::{PageContextSnapshot, SnapshotProvider};

/// Number of applied style keys reported as existing customizations.
const RECENT_CUSTOMIZATIONS: usize = 3;

struct CachedSnapshot {
    taken_at: Instant,
    snapshot: PageContextSnapshot,
}

/// Caches the snapshot built by an inner provider for a fixed TTL.
///
/// Planning and the generative tools share one cache, so a command that
/// plans and then executes several generative actions builds the page
/// description once.
pub struct PageContextCache {
    inner: Arc<dyn SnapshotProvider>,
    styles: Arc<AppliedStyleSet>,
    ttl: Duration,
    slot: Mutex<Option<CachedSnapshot>>,
}

impl PageContextCache {
    pub fn new(inner: Arc<dyn SnapshotProvider>, styles: Arc<AppliedStyleSet>, ttl: Duration) -> Self {
        Self {
            inner,
            styles,
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop the cached snapshot so the next read rebuilds it.
    pub fn invalidate(&self) {
        if self.slot.lock().take().is_some() {
            debug!("Page context cache invalidated");
        }
    }

    /// Whether a snapshot younger than the TTL is held.
    pub fn is_fresh(&self) -> bool {
        self.slot
            .lock()
            .as_ref()
            .is_some_and(|cached| cached.taken_at.elapsed() < self.ttl)
    }

    fn cached(&self) -> Option<PageContextSnapshot> {
        let slot = self.slot.lock();
        slot.as_ref()
            .filter(|cached| cached.taken_at.elapsed() < self.ttl)
            .map(|cached| cached.snapshot.clone())
    }
}

#[async_trait]
impl SnapshotProvider for PageContextCache {
    async fn snapshot(&self) -> Result<PageContextSnapshot, DocumentError> {
        if let Some(snapshot) = self.cached() {
            return Ok(snapshot);
        }

        let mut snapshot = self.inner.snapshot().await?;
        snapshot.existing_customizations = self.styles.recent(RECENT_CUSTOMIZATIONS);
        debug!(url = %snapshot.url, "Built fresh page context");

        *self.slot.lock() = Some(CachedSnapshot {
            taken_at: Instant::now(),
            snapshot: snapshot.clone(),
        });
        Ok(snapshot)
    }
}
