//! Plan executor: settle-all concurrent dispatch.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::join_all;
use tracing::{debug, warn};

use webtailor_protocols::error::{DispatchError, ToolError};
use webtailor_protocols::plan::{Action, ActionOutcome};

use crate::registry::ToolRegistry;

/// Runs actions against the tool registry.
///
/// Every action is dispatched concurrently and awaited jointly. One
/// action's failure never cancels a sibling, and the returned outcomes are
/// positionally aligned with the input.
#[derive(Clone)]
pub struct PlanExecutor {
    registry: Arc<ToolRegistry>,
}

impl PlanExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Execute `actions`, returning exactly one outcome per action, in order.
    pub async fn execute(&self, actions: &[Action]) -> Vec<ActionOutcome> {
        let pending = actions.iter().enumerate().map(|(index, action)| async move {
            debug!(index, tool = %action.tool, "Dispatching action");
            let result = AssertUnwindSafe(
                self.registry
                    .invoke(&action.tool, action.parameters.clone()),
            )
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                Err(DispatchError::Execution {
                    tool: action.tool.clone(),
                    source: ToolError::ExecutionFailed("tool panicked".to_string()),
                })
            });

            match result {
                Ok(output) => {
                    debug!(index, tool = %action.tool, "Action succeeded");
                    ActionOutcome::succeeded(action, output)
                }
                Err(err) => {
                    warn!(index, tool = %action.tool, error = %err, "Action failed");
                    ActionOutcome::failed(action, &err)
                }
            }
        });

        join_all(pending).await
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
