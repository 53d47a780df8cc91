//! Plan generation from a natural-language command.

use std::sync::Arc;

use tracing::{debug, warn};

use webtailor_core::{ToolRegistry, parse_json_response};
use webtailor_protocols::plan::ExecutionPlan;
use webtailor_protocols::provider::GenerationClient;
use webtailor_protocols::snapshot::PageContextSnapshot;
use webtailor_protocols::tool::ToolDefinition;

/// Headlines quoted in the planning prompt.
const PROMPT_HEADLINES: usize = 2;

/// Asks the generation service for an execution plan.
///
/// Planning never fails outright: a generation or parse failure yields an
/// empty plan whose reasoning explains what went wrong.
#[derive(Clone)]
pub struct Planner {
    registry: Arc<ToolRegistry>,
    generation: Arc<dyn GenerationClient>,
}

impl Planner {
    pub fn new(registry: Arc<ToolRegistry>, generation: Arc<dyn GenerationClient>) -> Self {
        Self {
            registry,
            generation,
        }
    }

    pub async fn plan(&self, command: &str, snapshot: &PageContextSnapshot) -> ExecutionPlan {
        let prompt = build_prompt(command, snapshot, &self.registry.list());

        let response = match self.generation.generate(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Planning call failed");
                return planning_failure(&e);
            }
        };

        match parse_json_response::<ExecutionPlan>(&response) {
            Ok(plan) => {
                debug!(actions = plan.actions.len(), "Parsed execution plan");
                plan
            }
            Err(e) => {
                warn!(error = %e, "Planning response was not a plan");
                planning_failure(&e)
            }
        }
    }
}

fn planning_failure(error: &dyn std::fmt::Display) -> ExecutionPlan {
    ExecutionPlan::empty(format!(
        "Failed to generate execution plan due to AI call error: {}",
        error
    ))
}

fn describe_tools(tools: &[ToolDefinition]) -> String {
    tools
        .iter()
        .map(|tool| {
            format!(
                "- {}: {}\n  Parameters: {}",
                tool.id,
                tool.description,
                tool.parameter_summary()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the planning prompt for `command` against the page described by `snapshot`.
pub fn build_prompt(command: &str, snapshot: &PageContextSnapshot, tools: &[ToolDefinition]) -> String {
    let headlines = snapshot
        .headlines
        .iter()
        .take(PROMPT_HEADLINES)
        .map(|h| h.text.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    let main_content = serde_json::Value::String(snapshot.structure.main_content_selector.clone());

    format!(
        r#"You are an AI agent that customizes web pages based on user commands.
Your goal is to create an execution plan consisting of one or more actions.
Each action involves selecting an appropriate tool and its parameters.

User Command: "{command}"

Page Context:
- URL: {url}
- Title: {title}
- Main Content Structure: {main_content}
- Theme: {theme}
- Headlines (sample): {headlines}
- Paragraphs (sample count): {paragraphs}

Available Tools:
{tools}

Instructions for response:
1. Analyze the user command carefully in the context of the web page.
2. Select the most appropriate tool(s) to achieve the user's goal. You can use multiple tools if needed.
3. For each tool, determine the correct parameters based on the command and page context.
   - For CSS or selection, if the user is vague (e.g., "make text bigger"), infer reasonable targets.
   - If selecting elements, use specific criteria if possible.
   - If generating CSS, provide a clear description to work with.
4. Respond with ONLY a valid JSON object following this structure:
{{
    "reasoning": "Brief analysis of the command and your approach to fulfill it.",
    "actions": [
        {{
            "tool": "toolName",
            "parameters": {{ "param1": "value1" }},
            "reasoning": "Brief explanation for this step."
        }}
    ]
}}

Focus on efficiency and directness. If a command is simple, the plan should be simple.
If the command is ambiguous, make a reasonable interpretation or use a general tool.
Example: If user says "dark mode", your 'generateCSS' description should be "apply a dark theme to the page".
Example: If user says "hide ads", 'hideElements' criteria should be "advertisements, sponsored content".
Example: If user says "summarize this article", 'summarizeContent' could be used with no selectors.
Example: If user says "make the headings blue and summarize the intro", this would be two actions: one 'generateCSS' for headings, one 'summarizeContent' for intro paragraphs.
Do not invent tools. Only use the tools provided.
If no suitable tool or action can be determined, respond with an empty "actions" array and explain why in the "reasoning".
"#,
        command = command,
        url = snapshot.url,
        title = snapshot.title,
        main_content = main_content,
        theme = snapshot.theme,
        headlines = headlines,
        paragraphs = snapshot.paragraphs.len(),
        tools = describe_tools(tools),
    )
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
