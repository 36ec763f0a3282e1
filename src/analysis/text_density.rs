//! Text density analysis
//!
//! Measures how much human-visible text a raw document carries and whether
//! it carries the fingerprint of a client-side framework. Both are pure
//! functions of the input HTML.

use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::utils::collapse_whitespace;

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid")
});

/// Elements whose text never renders
const INVISIBLE_CONTAINERS: &[&str] = &["script", "style", "noscript", "template"];

/// One client-framework fingerprint
#[derive(Debug, Clone, Copy)]
pub struct FrameworkMarker {
    pub framework: &'static str,
    /// Matched case-insensitively as a substring of the raw HTML
    pub needle: &'static str,
}

/// Fixed marker set, scanned in order
pub const FRAMEWORK_MARKERS: &[FrameworkMarker] = &[
    FrameworkMarker { framework: "react", needle: "data-reactroot" },
    FrameworkMarker { framework: "react", needle: "data-react-helmet" },
    FrameworkMarker { framework: "react", needle: "react-dom" },
    FrameworkMarker { framework: "next", needle: "id=\"__next\"" },
    FrameworkMarker { framework: "next", needle: "__next_data__" },
    FrameworkMarker { framework: "next", needle: "_next/static" },
    FrameworkMarker { framework: "vue", needle: "data-v-app" },
    FrameworkMarker { framework: "vue", needle: "id=\"app\"" },
    FrameworkMarker { framework: "vue", needle: "vue.runtime" },
    FrameworkMarker { framework: "nuxt", needle: "id=\"__nuxt\"" },
    FrameworkMarker { framework: "nuxt", needle: "_nuxt/" },
    FrameworkMarker { framework: "angular", needle: "ng-version" },
    FrameworkMarker { framework: "angular", needle: "ng-app" },
    FrameworkMarker { framework: "angular", needle: "<app-root" },
    FrameworkMarker { framework: "infinite-scroll", needle: "infinite-scroll" },
    FrameworkMarker { framework: "infinite-scroll", needle: "data-infinite" },
];

/// Result of analyzing one raw document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityReport {
    /// Characters of whitespace-collapsed text inside `<body>`
    pub visible_text_length: usize,
    pub has_framework_marker: bool,
    /// Distinct framework names whose markers matched, in table order
    pub frameworks: Vec<String>,
}

/// Analyze raw HTML for visible text volume and framework fingerprints.
#[must_use]
pub fn analyze(html: &str) -> DensityReport {
    let document = Html::parse_document(html);
    let text = visible_text(&document);
    let frameworks = detect_frameworks(html);

    DensityReport {
        visible_text_length: text.chars().count(),
        has_framework_marker: !frameworks.is_empty(),
        frameworks,
    }
}

/// Whitespace-collapsed text of the body, skipping script/style/comment content.
#[must_use]
pub fn visible_text(document: &Html) -> String {
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return String::new();
    };

    let mut raw = String::new();
    collect_visible_text(body, &mut raw);
    collapse_whitespace(&raw)
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) => {
                if INVISIBLE_CONTAINERS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_visible_text(child_el, out);
                }
            }
            // Comments, doctypes and processing instructions carry no visible text
            _ => {}
        }
    }
}

fn detect_frameworks(html: &str) -> Vec<String> {
    let lowered = html.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for marker in FRAMEWORK_MARKERS {
        if lowered.contains(marker.needle) && !found.iter().any(|f| f == marker.framework) {
            found.push(marker.framework.to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_script_style_and_comments() {
        let html = r"<html><head><title>T</title></head><body>
            <script>var hidden = 'not visible at all';</script>
            <style>.x { color: red }</style>
            <!-- a comment that is long enough to matter -->
            <p>Hello   world</p>
        </body></html>";
        let report = analyze(html);
        assert_eq!(report.visible_text_length, "Hello world".len());
        assert!(!report.has_framework_marker);
    }

    #[test]
    fn detects_next_marker() {
        let html = r#"<html><body><div id="__next"><p>hi</p></div>
            <script src="/_next/static/chunks/main.js"></script></body></html>"#;
        let report = analyze(html);
        assert!(report.has_framework_marker);
        assert_eq!(report.frameworks, vec!["next".to_string()]);
    }

    #[test]
    fn marker_scan_is_case_insensitive() {
        let report = analyze(r#"<html><body><div NG-VERSION="17.0.0">x</div></body></html>"#);
        assert!(report.has_framework_marker);
        assert_eq!(report.frameworks, vec!["angular".to_string()]);
    }

    #[test]
    fn empty_document_has_no_text() {
        let report = analyze("");
        assert_eq!(report.visible_text_length, 0);
    }
}
