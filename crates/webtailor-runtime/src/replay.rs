//! Replay of stored rules on a fresh load.

use std::sync::Arc;

use tracing::{debug, info, warn};

use webtailor_core::PlanExecutor;
use webtailor_protocols::plan::Action;
use webtailor_protocols::rule::Rule;
use webtailor_store::RuleStore;

pub const DEFAULT_STALENESS_DAYS: u32 = 30;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// The rules worth replaying: newer than the staleness horizon, with at
/// least one stored action, and not recorded as having failed entirely.
pub fn effective_rules(rules: Vec<Rule>, now_ms: i64, staleness_days: u32) -> Vec<Rule> {
    let horizon = now_ms - i64::from(staleness_days) * DAY_MS;
    rules
        .into_iter()
        .filter(|rule| rule.timestamp > horizon)
        .filter(|rule| !rule.execution_plan.is_empty())
        .filter(Rule::had_success)
        .collect()
}

/// What one replay pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Rules that passed the filter.
    pub rules: usize,
    /// Actions dispatched across those rules.
    pub actions: usize,
    /// Actions that failed. Logged and otherwise ignored.
    pub failed: usize,
}

/// Drives stored rules back through the plan executor.
///
/// Replay never fails and never writes: outcomes are logged and dropped.
pub struct ReplayController {
    store: Arc<RuleStore>,
    executor: PlanExecutor,
    staleness_days: u32,
}

impl ReplayController {
    pub fn new(store: Arc<RuleStore>, executor: PlanExecutor) -> Self {
        Self {
            store,
            executor,
            staleness_days: DEFAULT_STALENESS_DAYS,
        }
    }

    pub fn with_staleness_days(mut self, days: u32) -> Self {
        self.staleness_days = days;
        self
    }

    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }

    /// Whether `origin` has any stored rules, effective or not.
    pub async fn has_rules(&self, origin: &str) -> bool {
        !self.store.load(origin).await.is_empty()
    }

    /// Replay every action of every effective rule for `origin` concurrently.
    pub async fn apply_effective_rules(&self, origin: &str) -> ReplaySummary {
        let stored = self.store.load(origin).await;
        if stored.is_empty() {
            debug!(%origin, "No stored rules to replay");
            return ReplaySummary::default();
        }

        let now = chrono::Utc::now().timestamp_millis();
        let rules = effective_rules(stored, now, self.staleness_days);
        if rules.is_empty() {
            debug!(%origin, "No recent or effective rules to replay");
            return ReplaySummary::default();
        }

        let (actions, commands): (Vec<Action>, Vec<&str>) = rules
            .iter()
            .flat_map(|rule| {
                rule.execution_plan
                    .actions
                    .iter()
                    .map(move |action| (action.clone(), rule.command.as_str()))
            })
            .unzip();

        info!(%origin, rules = rules.len(), actions = actions.len(), "Replaying stored rules");
        let outcomes = self.executor.execute(&actions).await;

        let mut failed = 0;
        for (outcome, command) in outcomes.iter().zip(&commands) {
            if !outcome.success {
                failed += 1;
                warn!(
                    %origin,
                    tool = %outcome.tool,
                    command = %command,
                    error = outcome.error.as_deref().unwrap_or_default(),
                    "Failed to reapply stored action"
                );
            }
        }

        info!(%origin, failed, "Finished reapplying stored rules");
        ReplaySummary {
            rules: rules.len(),
            actions: actions.len(),
            failed,
        }
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
