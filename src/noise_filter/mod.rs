//! Noise suppression
//!
//! Cookie/consent banners, modals, and overlays are removed only when their
//! text mentions one of [`NOISE_KEYWORDS`]; `script`, `style`, and comment
//! nodes are always removed from parsed documents.

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

use crate::renderer::{DriverError, RenderedPage};

/// Elements that may be noise, checked against [`NOISE_KEYWORDS`]
pub const NOISE_SELECTORS: &[&str] = &[
    "[class*=\"cookie\"]",
    "[id*=\"cookie\"]",
    "[class*=\"gdpr\"]",
    "[class*=\"consent\"]",
    "[id*=\"consent\"]",
    "[class*=\"banner\"]",
    "[role=\"dialog\"]",
    "[role=\"alertdialog\"]",
    "[aria-modal=\"true\"]",
    ".modal",
    "[class*=\"popup\"]",
    "[class*=\"overlay\"]",
    "[class*=\"backdrop\"]",
];

/// Lowercase keywords; a candidate is removed if its text contains any of them
pub const NOISE_KEYWORDS: &[&str] = &["cookie", "consent", "privacy", "gdpr", "accept", "decline"];

/// Never content
const ALWAYS_REMOVED: &str = "script, style";

static COMPILED_NOISE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    NOISE_SELECTORS
        .iter()
        .map(|s| {
            Selector::parse(s).expect("BUG: hardcoded CSS selector in NOISE_SELECTORS is invalid")
        })
        .collect()
});

static ALWAYS_REMOVED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(ALWAYS_REMOVED).expect("BUG: hardcoded CSS selector 'script, style' is invalid")
});

/// Whether `text` mentions a noise keyword (case-insensitive)
#[must_use]
pub fn mentions_noise_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    NOISE_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn noise_nodes(document: &Html) -> Vec<NodeId> {
    let mut doomed: Vec<NodeId> = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();

    for node in document.tree.nodes() {
        if node.value().is_comment() && seen.insert(node.id()) {
            doomed.push(node.id());
        }
    }

    for element in document.select(&ALWAYS_REMOVED_SELECTOR) {
        if seen.insert(element.id()) {
            doomed.push(element.id());
        }
    }

    for selector in COMPILED_NOISE.iter() {
        for element in document.select(selector) {
            if seen.contains(&element.id()) {
                continue;
            }
            if is_gated_noise(element) {
                seen.insert(element.id());
                doomed.push(element.id());
            }
        }
    }

    doomed
}

fn is_gated_noise(element: ElementRef<'_>) -> bool {
    // body/html can carry banner-ish classes on real sites; never strip the page itself
    if matches!(element.value().name(), "html" | "body" | "main") {
        return false;
    }
    let text: String = element.text().collect();
    mentions_noise_keyword(&text)
}

/// Remove noise from a parsed document in place, returning how many nodes went.
pub fn strip(document: &mut Html) -> usize {
    let doomed = noise_nodes(document);
    let count = doomed.len();
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    count
}

/// Parse, strip, and re-serialize an HTML document.
#[must_use]
pub fn strip_document(html: &str) -> String {
    let mut document = Html::parse_document(html);
    let removed = strip(&mut document);
    debug!("Noise filter removed {} nodes", removed);
    document.html()
}

/// Script that removes keyword-gated noise from the live DOM and returns the removal count.
///
/// Scripts and styles are left alone on a live page: removing styles would
/// change visibility, and the captured HTML is stripped again before segmentation.
#[must_use]
pub fn rendered_strip_script() -> String {
    let selectors = serde_json::to_string(NOISE_SELECTORS).unwrap_or_else(|_| "[]".to_string());
    let keywords = serde_json::to_string(NOISE_KEYWORDS).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"(() => {{
    const selectors = {selectors};
    const keywords = {keywords};
    let removed = 0;
    for (const selector of selectors) {{
        let nodes;
        try {{ nodes = document.querySelectorAll(selector); }} catch (e) {{ continue; }}
        nodes.forEach(el => {{
            if (el === document.body || el === document.documentElement || !el.isConnected) return;
            const text = (el.innerText || el.textContent || '').toLowerCase();
            if (keywords.some(k => text.includes(k))) {{
                el.remove();
                removed++;
            }}
        }});
    }}
    if (document.body) document.body.style.overflow = '';
    if (document.documentElement) document.documentElement.style.overflow = '';
    return removed;
}})()"#
    )
}

/// Remove keyword-gated noise from a live page.
pub async fn strip_rendered(page: &dyn RenderedPage) -> Result<u64, DriverError> {
    let removed = page
        .evaluate_script(&rendered_strip_script())
        .await?
        .as_u64()
        .unwrap_or_default();
    debug!("Removed {} noise elements from rendered page", removed);
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head><style>body { color: red; }</style><script>var x = 1;</script></head>
<body>
<!-- tracking -->
<div class="cookie-banner">We use cookies. <button>Accept</button></div>
<div class="hero-banner"><h1>Fresh coffee delivered</h1><p>Every morning.</p></div>
<div role="dialog" aria-modal="true">Subscribe to our newsletter</div>
<main><p>Body text stays.</p><script>track();</script></main>
</body></html>"#;

    #[test]
    fn removes_keyword_gated_noise_only() {
        let out = strip_document(PAGE);
        assert!(!out.contains("We use cookies"));
        assert!(out.contains("Fresh coffee delivered"), "banner class without keyword kept");
        assert!(out.contains("Subscribe to our newsletter"), "dialog without keyword kept");
        assert!(out.contains("Body text stays."));
    }

    #[test]
    fn always_removes_script_style_and_comments() {
        let out = strip_document(PAGE);
        assert!(!out.contains("<script"));
        assert!(!out.contains("<style"));
        assert!(!out.contains("tracking"));
        assert!(!out.contains("track();"));
    }

    #[test]
    fn stripping_twice_equals_stripping_once() {
        let once = strip_document(PAGE);
        let twice = strip_document(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert!(mentions_noise_keyword("Manage PRIVACY settings"));
        assert!(mentions_noise_keyword("GDPR notice"));
        assert!(!mentions_noise_keyword("Latest stories"));
    }

    #[test]
    fn rendered_script_embeds_rule_tables() {
        let script = rendered_strip_script();
        assert!(script.contains("[class*=\\\"cookie\\\"]"));
        assert!(script.contains("\"decline\""));
    }
}
