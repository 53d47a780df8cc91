//! Cache transform: freeze resolved generative actions into `applyCSS`.

use tracing::debug;

use webtailor_protocols::plan::{Action, ActionOutcome, ExecutionPlan};

/// Derive the plan that should run on replay.
///
/// Every action whose outcome succeeded with a string `css` result is
/// replaced by an `applyCSS` action carrying that stylesheet. Everything
/// else is kept verbatim, so replay retries the original step.
pub fn derive_storage_plan(plan: &ExecutionPlan, outcomes: &[ActionOutcome]) -> ExecutionPlan {
    let actions = plan
        .actions
        .iter()
        .enumerate()
        .map(|(index, action)| match outcomes.get(index) {
            Some(outcome) => freeze(action, outcome).unwrap_or_else(|| action.clone()),
            None => action.clone(),
        })
        .collect();

    ExecutionPlan {
        reasoning: plan.reasoning.clone(),
        actions,
    }
}

fn freeze(action: &Action, outcome: &ActionOutcome) -> Option<Action> {
    let css = outcome.css_text()?;
    let description = storage_description(action, outcome);
    debug!(tool = %action.tool, %description, "Freezing resolved action into applyCSS");
    Some(Action::apply_css(css, description))
}

fn storage_description(action: &Action, outcome: &ActionOutcome) -> String {
    if let Some(description) = outcome.result.as_ref().and_then(|r| r.description()) {
        return description.to_string();
    }
    if let Some(description) = action.str_param("description") {
        return description.to_string();
    }
    if let Some(transformation) = action.str_param("transformation") {
        return transformation.to_string();
    }
    if let Some(criteria) = action.str_param("criteria") {
        return format!("Hide: {}", criteria);
    }
    format!("Cached CSS for {}", action.tool)
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
