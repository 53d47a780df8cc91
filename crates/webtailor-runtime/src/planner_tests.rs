use super::*;

use webtailor_protocols::error::GenerationError;
use webtailor_protocols::snapshot::{PageStructure, TextSample};

use crate::testing::{ScriptedGeneration, counting_registry};

fn snapshot() -> PageContextSnapshot {
    let headline = |text: &str| TextSample {
        text: text.to_string(),
        selector: "h1".to_string(),
        tag: "h1".to_string(),
    };
    PageContextSnapshot {
        url: "https://news.example.com/story".to_string(),
        domain: "example.com".to_string(),
        title: "Story".to_string(),
        headlines: vec![headline("First"), headline("Second"), headline("Third")],
        structure: PageStructure {
            main_content_selector: "article".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_prompt_lists_tools_and_context() {
    let (registry, _) = counting_registry();
    let prompt = build_prompt("hide ads", &snapshot(), &registry.list());

    assert!(prompt.contains(r#"User Command: "hide ads""#));
    assert!(prompt.contains("- URL: https://news.example.com/story"));
    assert!(prompt.contains(r#"- Main Content Structure: "article""#));
    assert!(prompt.contains("- Headlines (sample): First; Second\n"));
    assert!(prompt.contains("- Paragraphs (sample count): 0"));
    assert!(prompt.contains("- Theme: light"));
    assert!(prompt.contains("- count: Count invocations\n  Parameters: {\"label\":\"string\"}"));
    assert!(prompt.contains("- fail: Always fails\n  Parameters: {}"));
}

#[tokio::test]
async fn test_plan_parses_fenced_response() {
    let (registry, _) = counting_registry();
    let generation = ScriptedGeneration::new(vec![
        "```json\n{\"reasoning\":\"hide them\",\"actions\":[{\"tool\":\"hideElements\",\"parameters\":{\"criteria\":\"ads\"},\"reasoning\":\"ads\"}]}\n```",
    ]);
    let planner = Planner::new(registry, generation.clone());

    let plan = planner.plan("hide ads", &snapshot()).await;
    assert_eq!(plan.reasoning, "hide them");
    assert_eq!(plan.actions.len(), 1);
    assert_eq!(plan.actions[0].tool, "hideElements");
    assert_eq!(plan.actions[0].str_param("criteria"), Some("ads"));
    assert_eq!(generation.calls(), 1);
}

#[tokio::test]
async fn test_generation_failure_yields_empty_plan() {
    let (registry, _) = counting_registry();
    let generation = ScriptedGeneration::failing(GenerationError::Network("offline".to_string()));
    let planner = Planner::new(registry, generation);

    let plan = planner.plan("hide ads", &snapshot()).await;
    assert!(plan.is_empty());
    assert!(
        plan.reasoning
            .starts_with("Failed to generate execution plan due to AI call error:")
    );
    assert!(plan.reasoning.contains("offline"));
}

#[tokio::test]
async fn test_unparseable_response_yields_empty_plan() {
    let (registry, _) = counting_registry();
    let generation = ScriptedGeneration::new(vec!["I would hide the ads."]);
    let planner = Planner::new(registry, generation);

    let plan = planner.plan("hide ads", &snapshot()).await;
    assert!(plan.is_empty());
    assert!(plan.reasoning.contains("I would hide the ads."));
}
