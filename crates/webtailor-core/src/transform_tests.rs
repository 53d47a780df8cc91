use super::*;
use serde_json::json;
use webtailor_protocols::error::{DispatchError, ToolError};
use webtailor_protocols::tool::ToolOutput;

fn plan(actions: Vec<Action>) -> ExecutionPlan {
    ExecutionPlan::new("test plan", actions)
}

fn ok(action: &Action, value: serde_json::Value) -> ActionOutcome {
    ActionOutcome::succeeded(action, ToolOutput::new(value))
}

#[test]
fn test_generate_css_is_frozen() {
    let action = Action::new(
        "generateCSS",
        json!({"description": "D", "targetElements": []}),
    );
    let outcome = ok(&action, json!({"css": "h1{color:blue}", "description": "D"}));

    let stored = derive_storage_plan(&plan(vec![action]), &[outcome]);
    assert_eq!(
        stored.actions[0],
        Action::new("applyCSS", json!({"css": "h1{color:blue}", "description": "D"}))
    );
    assert_eq!(stored.reasoning, "test plan");
}

#[test]
fn test_actions_without_css_are_identical() {
    let modify = Action::new(
        "modifyText",
        json!({"selectors": ["p"], "transformType": "simplify", "instructions": ""}),
    );
    let select = Action::new("selectElements", json!({"criteria": "headings"}));
    let outcomes = vec![
        ok(&modify, json!({"modifiedCount": 3})),
        ok(&select, json!({"selected": ["h1"]})),
    ];
    let original = plan(vec![modify, select]);

    let stored = derive_storage_plan(&original, &outcomes);
    assert_eq!(stored, original);
    assert_eq!(
        serde_json::to_string(&stored.actions).unwrap(),
        serde_json::to_string(&original.actions).unwrap()
    );
}

#[test]
fn test_failed_generative_action_kept() {
    let action = Action::new("generateCSS", json!({"description": "dark mode"}));
    let err = DispatchError::Execution {
        tool: "generateCSS".to_string(),
        source: ToolError::ExecutionFailed("quota".to_string()),
    };
    let outcome = ActionOutcome::failed(&action, &err);

    let stored = derive_storage_plan(&plan(vec![action.clone()]), &[outcome]);
    assert_eq!(stored.actions[0], action);
}

#[test]
fn test_null_css_is_not_frozen() {
    let action = Action::new("hideElements", json!({"criteria": "ads"}));
    let outcome = ok(
        &action,
        json!({"hiddenSelectors": [], "css": null, "description": "Hide: ads"}),
    );
    let stored = derive_storage_plan(&plan(vec![action.clone()]), &[outcome]);
    assert_eq!(stored.actions[0], action);
}

#[test]
fn test_hide_elements_uses_result_description() {
    let action = Action::new("hideElements", json!({"criteria": "ads"}));
    let css = ".ad-banner { display: none !important; }";
    let outcome = ok(
        &action,
        json!({"hiddenSelectors": [".ad-banner"], "css": css, "description": "Hide: ads"}),
    );
    let stored = derive_storage_plan(&plan(vec![action]), &[outcome]);
    assert_eq!(stored.actions[0], Action::apply_css(css, "Hide: ads"));
}

#[test]
fn test_description_fallbacks() {
    let layout = Action::new("transformLayout", json!({"transformation": "two columns"}));
    let hide = Action::new("hideElements", json!({"criteria": "popups"}));
    let other = Action::new("customTool", json!({}));
    let outcomes = vec![
        ok(&layout, json!({"css": "main{columns:2}"})),
        ok(&hide, json!({"css": ".popup{display:none}", "description": ""})),
        ok(&other, json!({"css": "body{}"})),
    ];

    let stored = derive_storage_plan(&plan(vec![layout, hide, other]), &outcomes);
    assert_eq!(stored.actions[0].str_param("description"), Some("two columns"));
    assert_eq!(stored.actions[1].str_param("description"), Some("Hide: popups"));
    assert_eq!(
        stored.actions[2].str_param("description"),
        Some("Cached CSS for customTool")
    );
    assert!(stored.actions.iter().all(Action::is_frozen));
}

#[test]
fn test_direct_apply_css_untouched() {
    let action = Action::apply_css("a{color:red}", "links red");
    let outcome = ok(
        &action,
        json!({"appliedInThisCall": true, "alreadyAppliedSession": false, "description": "links red"}),
    );
    let stored = derive_storage_plan(&plan(vec![action.clone()]), &[outcome]);
    assert_eq!(stored.actions[0], action);
}

#[test]
fn test_mixed_plan_rewrites_by_index() {
    let generate = Action::new("generateCSS", json!({"description": "bigger fonts"}));
    let modify = Action::new("modifyText", json!({"selectors": ["p"]}));
    let outcomes = vec![
        ok(&generate, json!({"css": "body{font-size:18px}", "description": "Generated CSS: bigger fonts"})),
        ok(&modify, json!({"modifiedCount": 1})),
    ];
    let stored = derive_storage_plan(&plan(vec![generate, modify.clone()]), &outcomes);
    assert!(stored.actions[0].is_frozen());
    assert_eq!(stored.actions[0].str_param("css"), Some("body{font-size:18px}"));
    assert_eq!(stored.actions[1], modify);
}
