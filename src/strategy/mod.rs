//! Fetch strategy selection
//!
//! Decides whether the cheap static fetch is good enough or the page has to
//! go through the browser. Rules are evaluated in order and the first match
//! wins:
//!
//! 1. static fetch failed → `js-forced`
//! 2. URL matches a dynamic-content pattern → `js`
//! 3. too little visible text, or a framework marker with little text → `js`
//! 4. otherwise → `static`

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use crate::analysis::{self, DensityReport};
use crate::fetch::FetchError;

/// How the HTML in a result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchStrategy {
    Static,
    Js,
    JsForced,
    StaticFallback,
    StaticPaginated,
    Error,
}

impl FetchStrategy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Js => "js",
            Self::JsForced => "js-forced",
            Self::StaticFallback => "static-fallback",
            Self::StaticPaginated => "static-paginated",
            Self::Error => "error",
        }
    }

    /// Whether this strategy goes through the browser
    #[must_use]
    pub const fn is_rendered(&self) -> bool {
        matches!(self, Self::Js | Self::JsForced)
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the static fetch produced
#[derive(Debug, Clone, Copy)]
pub enum FetchOutcome<'a> {
    Fetched { html: &'a str },
    Failed(&'a FetchError),
}

/// Thresholds for the text-density rule
#[derive(Debug, Clone, Copy)]
pub struct DensityThresholds {
    pub min_static_text_length: usize,
    pub framework_text_threshold: usize,
}

impl From<&crate::config::ScrapeConfig> for DensityThresholds {
    fn from(config: &crate::config::ScrapeConfig) -> Self {
        Self {
            min_static_text_length: config.min_static_text_length(),
            framework_text_threshold: config.framework_text_threshold(),
        }
    }
}

/// The chosen strategy and the rule that chose it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyDecision {
    pub strategy: FetchStrategy,
    pub reason: String,
}

/// URL patterns whose content is known to load through script
static DYNAMIC_URL_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)/(scroll|infinite|ajax|load-more|lazy)(/|$|\?|#)", "dynamic path segment"),
        (r"(?i)/js(/|$|\?|#)", "script-rendered path segment"),
        (r"(?i)[?&]page=", "paginated query"),
        (r"(?i)^https?://news\.ycombinator\.com(/|$)", "known paginated site"),
    ]
    .into_iter()
    .map(|(pattern, reason)| {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("BUG: hardcoded URL rule '{pattern}' is invalid: {e}"));
        (regex, reason)
    })
    .collect()
});

/// Reason string of the first dynamic-URL rule matching `url`
#[must_use]
pub fn dynamic_url_match(url: &str) -> Option<&'static str> {
    DYNAMIC_URL_RULES
        .iter()
        .find(|(regex, _)| regex.is_match(url))
        .map(|(_, reason)| *reason)
}

/// Choose the strategy for `url` given the static fetch outcome.
#[must_use]
pub fn choose_strategy(
    url: &str,
    outcome: FetchOutcome<'_>,
    thresholds: DensityThresholds,
) -> FetchStrategy {
    decide(url, outcome, thresholds).strategy
}

/// Same as [`choose_strategy`] but keeps the reason for logging.
#[must_use]
pub fn decide(
    url: &str,
    outcome: FetchOutcome<'_>,
    thresholds: DensityThresholds,
) -> StrategyDecision {
    let html = match outcome {
        FetchOutcome::Failed(err) => {
            return StrategyDecision {
                strategy: FetchStrategy::JsForced,
                reason: format!("static fetch failed: {err}"),
            };
        }
        FetchOutcome::Fetched { html } => html,
    };

    if let Some(reason) = dynamic_url_match(url) {
        return StrategyDecision {
            strategy: FetchStrategy::Js,
            reason: format!("url matches {reason}"),
        };
    }

    let report = analysis::analyze(html);
    debug!(
        visible_text_length = report.visible_text_length,
        frameworks = ?report.frameworks,
        "Analyzed static document"
    );
    density_decision(&report, thresholds)
}

fn density_decision(report: &DensityReport, thresholds: DensityThresholds) -> StrategyDecision {
    if report.visible_text_length < thresholds.min_static_text_length {
        return StrategyDecision {
            strategy: FetchStrategy::Js,
            reason: format!(
                "only {} visible characters (< {})",
                report.visible_text_length, thresholds.min_static_text_length
            ),
        };
    }

    if report.has_framework_marker && report.visible_text_length < thresholds.framework_text_threshold
    {
        return StrategyDecision {
            strategy: FetchStrategy::Js,
            reason: format!(
                "{} marker with {} visible characters (< {})",
                report.frameworks.join("/"),
                report.visible_text_length,
                thresholds.framework_text_threshold
            ),
        };
    }

    StrategyDecision {
        strategy: FetchStrategy::Static,
        reason: format!("{} visible characters", report.visible_text_length),
    }
}

/// Strategy to report when the rendered path failed.
///
/// Reuses the static document when one exists, otherwise nothing usable is left.
#[must_use]
pub const fn after_render_failure(has_static_html: bool) -> FetchStrategy {
    if has_static_html {
        FetchStrategy::StaticFallback
    } else {
        FetchStrategy::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: DensityThresholds = DensityThresholds {
        min_static_text_length: 500,
        framework_text_threshold: 2000,
    };

    fn page_with_text(chars: usize, extra: &str) -> String {
        let text = "a".repeat(chars);
        format!("<html><head>{extra}</head><body><p>{text}</p></body></html>")
    }

    #[test]
    fn sparse_page_needs_rendering() {
        let html = page_with_text(120, "");
        let s = choose_strategy("https://example.com/", FetchOutcome::Fetched { html: &html }, THRESHOLDS);
        assert_eq!(s, FetchStrategy::Js);
    }

    #[test]
    fn framework_with_moderate_text_needs_rendering() {
        let html = page_with_text(1200, r#"<script id="__NEXT_DATA__" type="application/json">{}</script>"#);
        let s = choose_strategy("https://example.com/", FetchOutcome::Fetched { html: &html }, THRESHOLDS);
        assert_eq!(s, FetchStrategy::Js);
    }

    #[test]
    fn framework_with_plenty_of_text_stays_static() {
        let html = page_with_text(2500, r#"<script src="/_next/static/x.js"></script>"#);
        let s = choose_strategy("https://example.com/", FetchOutcome::Fetched { html: &html }, THRESHOLDS);
        assert_eq!(s, FetchStrategy::Static);
    }

    #[test]
    fn dynamic_url_wins_over_density() {
        let html = page_with_text(5000, "");
        let s = choose_strategy(
            "https://quotes.toscrape.com/scroll",
            FetchOutcome::Fetched { html: &html },
            THRESHOLDS,
        );
        assert_eq!(s, FetchStrategy::Js);
        assert!(dynamic_url_match("https://example.com/list?page=2").is_some());
        assert!(dynamic_url_match("https://example.com/javascript-guide").is_none());
    }

    #[test]
    fn failed_fetch_forces_rendering() {
        let err = FetchError::Forbidden;
        let s = choose_strategy("https://example.com/", FetchOutcome::Failed(&err), THRESHOLDS);
        assert_eq!(s, FetchStrategy::JsForced);
    }

    #[test]
    fn strategy_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&FetchStrategy::StaticFallback).unwrap(),
            "\"static-fallback\""
        );
        assert_eq!(FetchStrategy::JsForced.to_string(), "js-forced");
        assert_eq!(after_render_failure(false), FetchStrategy::Error);
    }
}
