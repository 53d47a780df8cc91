//! Mutation-triggered, debounced replay.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use webtailor_config::WatchConfig;
use webtailor_protocols::document::{AddedNode, MutationRecord};

use crate::context_cache::PageContextCache;
use crate::replay::ReplayController;

fn is_structural(node: &AddedNode, config: &WatchConfig) -> bool {
    config
        .significant_tags
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(&node.tag))
        || node
            .classes
            .iter()
            .any(|class| config.significant_classes.contains(class))
        || node
            .id
            .as_deref()
            .is_some_and(|id| config.significant_ids.iter().any(|s| s == id))
}

/// Whether any added node is, or contains, a structural content region.
pub fn is_significant(record: &MutationRecord, config: &WatchConfig) -> bool {
    record
        .added_nodes
        .iter()
        .flat_map(AddedNode::descendants)
        .any(|node| is_structural(node, config))
}

/// Single-slot debounce timer in front of the replay controller.
///
/// Each significant mutation restarts the timer. When it expires the page
/// context cache is invalidated and, if the origin has rules, they are
/// replayed. Restarting the timer cancels only the wait; a replay that has
/// already started runs to completion.
pub struct MutationWatch {
    replay: Arc<ReplayController>,
    context: Arc<PageContextCache>,
    origin: String,
    config: WatchConfig,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl MutationWatch {
    pub fn new(
        replay: Arc<ReplayController>,
        context: Arc<PageContextCache>,
        origin: impl Into<String>,
        config: WatchConfig,
    ) -> Self {
        Self {
            replay,
            context,
            origin: origin.into(),
            config,
            pending: Mutex::new(None),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.config.debounce_ms)
    }

    /// Feed one batch of mutations. Returns whether it (re)started the timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn observe(&self, record: &MutationRecord) -> bool {
        if !is_significant(record, &self.config) {
            return false;
        }
        debug!(origin = %self.origin, "Significant DOM change, debouncing replay");

        let replay = self.replay.clone();
        let context = self.context.clone();
        let origin = self.origin.clone();
        let delay = self.debounce();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(settle(replay, context, origin));
        });

        if let Some(previous) = self.pending.lock().replace(timer) {
            previous.abort();
        }
        true
    }

    /// Whether a debounce timer is still waiting.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

async fn settle(replay: Arc<ReplayController>, context: Arc<PageContextCache>, origin: String) {
    context.invalidate();
    if !replay.has_rules(&origin).await {
        return;
    }
    info!(%origin, "Reapplying stored rules due to DOM change");
    replay.apply_effective_rules(&origin).await;
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
