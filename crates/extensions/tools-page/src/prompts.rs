//! Prompt text for the generative page tools.

use webtailor_protocols::snapshot::{ElementSample, PageContextSnapshot, PageStructure, Theme};

const SELECTION_SAMPLE: usize = 20;
const SAMPLE_TEXT_PREVIEW: usize = 60;

fn preview(text: &str, limit: usize) -> String {
    let cut: String = text.chars().take(limit).collect();
    cut.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn sample_line(el: &ElementSample) -> String {
    format!(
        "- Selector: {}, Text: \"{}...\", Tag: {}, Classes: {}, ID: {}",
        el.selector,
        preview(&el.text, SAMPLE_TEXT_PREVIEW),
        el.tag,
        el.classes,
        if el.id.is_empty() { "none" } else { &el.id }
    )
}

pub(crate) fn selection(
    criteria: &str,
    context: &str,
    snapshot: &PageContextSnapshot,
    candidates: &[&ElementSample],
) -> String {
    let samples: Vec<String> = candidates
        .iter()
        .take(SELECTION_SAMPLE)
        .map(|el| sample_line(el))
        .collect();
    let samples = if samples.is_empty() {
        "No specific elements pre-filtered, consider common tags for the criteria.".to_string()
    } else {
        samples.join("\n")
    };

    format!(
        r##"You select DOM elements with CSS selectors. Pick the selectors that best match the user's criteria.

User Criteria: "{criteria}"
Context for Selection: "{context}"
Page URL: {url}
Page Title: {title}

Candidate elements on the page:
{samples}

Rules:
- Prefer stable IDs, then specific class or attribute selectors. Avoid bare 'div' or 'p'.
- Include one selector per distinct group of matching elements.
- Return an empty "selected" array when nothing matches.

Respond with ONLY valid JSON:
{{"selected": ["#specificId", ".some-class > li"], "reasoning": "why these selectors"}}
"##,
        url = snapshot.url,
        title = snapshot.title,
    )
}

pub(crate) fn generate_css(description: &str, style_context: &str, theme: Theme) -> String {
    format!(
        r#"You write CSS from a description of the desired style.

User's Desired Style: "{description}"

{style_context}
Current Page Theme: {theme}

Rules:
- Write clean, modern CSS scoped to the elements the description is about.
- Theme requests (such as "dark mode") need rules for body, text, links and backgrounds.
- Layout requests should use flexbox or grid.
- Return ONLY raw CSS, without markdown fences or commentary.
- If nothing sensible can be generated, return an empty string.

CSS Code:
"#
    )
}

/// Context paragraph for [`generate_css`] describing the page or specific targets.
pub(crate) fn style_context(structure: &PageStructure, targets: &[(String, Option<String>)]) -> String {
    if targets.is_empty() {
        return format!(
            "General Page Style Context:\nMain Content Area: {}. Container: {}.",
            structure.main_content_selector, structure.container_type
        );
    }
    let lines: Vec<String> = targets
        .iter()
        .map(|(selector, found)| match found {
            Some(summary) => format!("Selector \"{}\": {}", selector, summary),
            None => format!("Selector \"{}\": (not found)", selector),
        })
        .collect();
    format!("Specific Target Elements Context:\n{}", lines.join("\n"))
}

pub(crate) fn transform_layout(transformation: &str, target: &str, structure: &PageStructure) -> String {
    format!(
        r#"Generate CSS for a page layout transformation.
Transformation Goal: "{transformation}"
Target Area/Selector Hint: "{target}"

Current Layout Context:
- Navigation Present: {nav}
- Sidebar Present: {sidebar}
- Footer Present: {footer}
- Main Content Area Selector: {main}
- Page Container Type: {container}

Rules:
- Use flexbox or grid where appropriate, scoped to '{target}' or its children.
- Avoid broad selectors such as 'div' or '*'.
- Return ONLY raw CSS, without markdown fences or commentary.

CSS Code:
"#,
        nav = structure.has_navigation,
        sidebar = structure.has_sidebar,
        footer = structure.has_footer,
        main = structure.main_content_selector,
        container = structure.container_type,
    )
}

pub(crate) fn transform_text(text: &str, transform_type: &str, instructions: &str) -> String {
    format!(
        r#"Transform the following text.
Original Text: "{text}"
Transformation Type: {transform_type}
Specific Instructions: {instructions}

Rules:
- Follow the transformation type and instructions exactly.
- Return ONLY the transformed text, with no preamble.
- If the transformation makes no sense for this text, return it unchanged.
"#
    )
}

pub(crate) fn summarize(text: &str, length: &str) -> String {
    format!(
        r#"Summarize the following text to a {length} length, keeping the key information.

Text:
"""
{text}
"""

Return only the summary.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_prompt_lists_candidates() {
        let snapshot = PageContextSnapshot {
            url: "https://example.com/".to_string(),
            title: "Example".to_string(),
            ..Default::default()
        };
        let el = ElementSample {
            selector: "#promo".to_string(),
            tag: "div".to_string(),
            text: "Limited   offer".to_string(),
            ..Default::default()
        };
        let prompt = selection("ads", "hiding elements", &snapshot, &[&el]);
        assert!(prompt.contains("User Criteria: \"ads\""));
        assert!(prompt.contains("- Selector: #promo, Text: \"Limited offer...\", Tag: div, Classes: , ID: none"));

        let prompt = selection("ads", "", &snapshot, &[]);
        assert!(prompt.contains("No specific elements pre-filtered"));
    }

    #[test]
    fn test_style_context_variants() {
        let structure = PageStructure::default();
        assert!(style_context(&structure, &[]).contains("Main Content Area: body"));
        let targets = vec![
            ("h1".to_string(), Some("tag h1".to_string())),
            (".gone".to_string(), None),
        ];
        let context = style_context(&structure, &targets);
        assert!(context.contains("Selector \"h1\": tag h1"));
        assert!(context.contains("Selector \".gone\": (not found)"));
    }
}
