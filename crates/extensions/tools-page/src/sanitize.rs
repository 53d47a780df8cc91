//! Cleanup of generated stylesheets before injection.

use std::sync::LazyLock;

use regex::Regex;

struct Neutralizer {
    pattern: Regex,
    replacement: &'static str,
}

fn neutralizer(pattern: &str, replacement: &'static str) -> Option<Neutralizer> {
    Regex::new(pattern).ok().map(|pattern| Neutralizer {
        pattern,
        replacement,
    })
}

/// Applied in order; later patterns see the output of earlier ones.
static NEUTRALIZERS: LazyLock<Vec<Neutralizer>> = LazyLock::new(|| {
    [
        neutralizer(r"(?is)<style.*?</style>", ""),
        neutralizer(r"(?is)<script.*?</script>", ""),
        neutralizer(r"(?i)javascript:", "/*javascript:*/"),
        neutralizer(r"(?i)expression\s*\(", "/*expression(*/"),
        neutralizer(r#"(?i)url\s*\(\s*['"]?\s*javascript:"#, "url(/*javascript:*/"),
        neutralizer(r"(?i)@import", "/*@import*/"),
    ]
    .into_iter()
    .flatten()
    .collect()
});

/// Strip embedded markup and comment out script-capable constructs.
///
/// Returns the trimmed result; an empty string means nothing is left to apply.
pub fn sanitize_css(css: &str) -> String {
    let mut sanitized = css.to_string();
    for n in NEUTRALIZERS.iter() {
        sanitized = n.pattern.replace_all(&sanitized, n.replacement).into_owned();
    }
    sanitized.trim().to_string()
}

/// Remove markdown code fences a model may wrap raw CSS in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```css", "").replace("```", "").trim().to_string()
}

/// Remove one leading and one trailing quote character from model prose.
pub fn strip_wrapping_quotes(text: &str) -> String {
    let text = text.strip_prefix(['"', '\'']).unwrap_or(text);
    let text = text.strip_suffix(['"', '\'']).unwrap_or(text);
    text.trim().to_string()
}
