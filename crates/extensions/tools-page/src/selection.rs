//! Keyword prefilter over snapshot element samples.

use webtailor_protocols::snapshot::ElementSample;

const UNFILTERED_LIMIT: usize = 50;
const FILTERED_LIMIT: usize = 50;
const FALLBACK_LIMIT: usize = 30;

fn mentions(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Narrow `elements` to those plausibly matching `criteria`.
///
/// The first keyword group the criteria mention decides the filter. Falls
/// back to a plain sample when nothing survives.
pub fn prefilter<'a>(elements: &'a [ElementSample], criteria: &str) -> Vec<&'a ElementSample> {
    if criteria.trim().is_empty() {
        return elements.iter().take(UNFILTERED_LIMIT).collect();
    }

    let criteria = criteria.to_lowercase();
    let keep: Box<dyn Fn(&ElementSample) -> bool> =
        if mentions(&criteria, &["headline", "title", "heading"]) {
            Box::new(|el: &ElementSample| {
                let classes = el.classes.to_lowercase();
                matches!(el.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
                    || mentions(&classes, &["title", "headline"])
                    || el.id.to_lowercase().contains("title")
            })
        } else if mentions(&criteria, &["ad", "advertisement", "sponsor"]) {
            Box::new(|el: &ElementSample| {
                let classes = el.classes.to_lowercase();
                mentions(&classes, &["ad", "advertisement", "sponsor"])
                    || el.id.to_lowercase().contains("ad")
                    || el.selector.contains("adsbygoogle")
            })
        } else if mentions(&criteria, &["navigation", "menu"]) {
            Box::new(|el: &ElementSample| {
                let classes = el.classes.to_lowercase();
                el.tag == "nav"
                    || el.id.to_lowercase().contains("menu")
                    || mentions(&classes, &["menu", "nav"])
            })
        } else if mentions(&criteria, &["sidebar", "aside"]) {
            Box::new(|el: &ElementSample| {
                el.tag == "aside"
                    || el.classes.to_lowercase().contains("side")
                    || el.id.to_lowercase().contains("sidebar")
            })
        } else if mentions(&criteria, &["button", "link"]) {
            Box::new(|el: &ElementSample| {
                let role = el.role.as_deref().unwrap_or_default();
                el.tag == "button"
                    || el.tag == "a"
                    || el.classes.to_lowercase().contains("button")
                    || role == "button"
                    || role == "link"
            })
        } else if mentions(&criteria, &["image", "picture"]) {
            Box::new(|el: &ElementSample| el.tag == "img" || el.tag == "picture")
        } else if mentions(&criteria, &["form", "input", "search"]) {
            Box::new(|el: &ElementSample| {
                el.tag == "form"
                    || el.tag == "input"
                    || el.classes.to_lowercase().contains("search")
                    || el.id.to_lowercase().contains("search")
                    || el.role.as_deref() == Some("search")
            })
        } else {
            let needle = criteria.clone();
            Box::new(move |el: &ElementSample| {
                el.text.to_lowercase().contains(&needle)
                    || el.classes.to_lowercase().contains(&needle)
                    || el.id.to_lowercase().contains(&needle)
            })
        };

    let filtered: Vec<_> = elements.iter().filter(|el| keep(el)).take(FILTERED_LIMIT).collect();
    if filtered.is_empty() {
        elements.iter().take(FALLBACK_LIMIT).collect()
    } else {
        filtered
    }
}
