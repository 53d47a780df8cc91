use super::*;
use serde_json::json;

use crate::error::ToolError;

#[test]
fn test_apply_css_action_shape() {
    let action = Action::apply_css("h1{color:blue}", "D");
    assert_eq!(
        serde_json::to_value(&action).unwrap(),
        json!({"tool": "applyCSS", "parameters": {"css": "h1{color:blue}", "description": "D"}})
    );
    assert!(action.is_frozen());
}

#[test]
fn test_action_missing_parameters_defaults_to_object() {
    let action: Action = serde_json::from_value(json!({"tool": "summarizeContent"})).unwrap();
    assert_eq!(action.parameters, json!({}));
    assert!(action.reasoning.is_none());
    assert!(!action.is_frozen());
}

#[test]
fn test_str_param_ignores_empty_and_non_strings() {
    let action = Action::new(
        "hideElements",
        json!({"criteria": "", "selectors": ["#ad"], "scope": "main"}),
    );
    assert_eq!(action.str_param("criteria"), None);
    assert_eq!(action.str_param("selectors"), None);
    assert_eq!(action.str_param("scope"), Some("main"));
}

#[test]
fn test_plan_parses_planner_shape() {
    let plan: ExecutionPlan = serde_json::from_value(json!({
        "reasoning": "hide ads",
        "actions": [
            {"tool": "hideElements", "parameters": {"criteria": "ads"}, "reasoning": "ads"}
        ]
    }))
    .unwrap();
    assert_eq!(plan.actions.len(), 1);
    assert_eq!(plan.actions[0].reasoning.as_deref(), Some("ads"));
}

#[test]
fn test_plan_without_actions_is_empty() {
    let plan: ExecutionPlan = serde_json::from_value(json!({"reasoning": "nothing"})).unwrap();
    assert!(plan.is_empty());
    assert!(ExecutionPlan::empty("x").is_empty());
}

#[test]
fn test_outcome_css_text_requires_success() {
    let action = Action::new("generateCSS", json!({"description": "D"}));
    let ok = ActionOutcome::succeeded(&action, ToolOutput::new(json!({"css": "a{}"})));
    assert_eq!(ok.css_text(), Some("a{}"));

    let err = DispatchError::Execution {
        tool: "generateCSS".to_string(),
        source: ToolError::ExecutionFailed("boom".to_string()),
    };
    let failed = ActionOutcome::failed(&action, &err);
    assert!(!failed.success);
    assert_eq!(failed.css_text(), None);
    assert!(failed.error.as_deref().unwrap().contains("boom"));
}

#[test]
fn test_outcome_reads_legacy_params_key() {
    let outcome: ActionOutcome = serde_json::from_value(json!({
        "tool": "applyCSS",
        "params": {"css": "a{}"},
        "success": true
    }))
    .unwrap();
    assert_eq!(outcome.parameters, json!({"css": "a{}"}));
    assert!(outcome.result.is_none());
}
