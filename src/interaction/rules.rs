//! Ordered rule tables for candidate discovery
//!
//! Each rule pairs a CSS selector with an optional text matcher. Tables are
//! tried in order; matching policy lives here, traversal lives in the phases.

/// Text condition on an element's normalized, lowercased text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    Contains(&'static str),
    /// Equal to, or starting with, the phrase followed by a non-letter
    Leading(&'static str),
}

impl TextMatch {
    #[must_use]
    pub fn matches(self, text: &str) -> bool {
        let text = crate::utils::collapse_whitespace(text).to_lowercase();
        match self {
            Self::Contains(phrase) => text.contains(phrase),
            Self::Leading(phrase) => text.strip_prefix(phrase).is_some_and(|rest| {
                rest.chars().next().is_none_or(|c| !c.is_alphanumeric())
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRule {
    pub selector: &'static str,
    pub text: Option<TextMatch>,
}

impl ElementRule {
    const fn css(selector: &'static str) -> Self {
        Self {
            selector,
            text: None,
        }
    }

    const fn with_text(selector: &'static str, text: TextMatch) -> Self {
        Self {
            selector,
            text: Some(text),
        }
    }

    /// Whether an element found by `selector` also satisfies the text condition
    #[must_use]
    pub fn accepts_text(&self, text: &str) -> bool {
        self.text.is_none_or(|m| m.matches(text))
    }
}

/// Tab-like controls, most specific first
pub const TAB_RULES: &[ElementRule] = &[
    ElementRule::css("[role=\"tab\"]:not([aria-selected=\"true\"])"),
    ElementRule::css("button[role=\"tab\"]:not([aria-selected=\"true\"])"),
    ElementRule::css("a[role=\"tab\"]:not([aria-selected=\"true\"])"),
    ElementRule::css("[data-state=\"inactive\"]"),
    ElementRule::css("[aria-selected=\"false\"]"),
    ElementRule::css(".tab:not(.active):not(.selected)"),
    ElementRule::css(".tab-item:not(.active):not(.selected)"),
    ElementRule::css("button.tab:not(.active)"),
    // Headless UI, Chakra UI, Material UI
    ElementRule::css("[data-headlessui-state=\"\"]"),
    ElementRule::css(".chakra-tabs__tab:not([aria-selected=\"true\"])"),
    ElementRule::css(".MuiTab-root:not(.Mui-selected)"),
    ElementRule::css("nav button:not(.active)"),
    ElementRule::css("[class*=\"tab\"][class*=\"button\"]:not([class*=\"active\"])"),
];

/// Tab candidates considered per rule
pub const TAB_CANDIDATES_PER_RULE: usize = 5;

const CLICKABLE: &str = "button, a, [role=\"button\"]";

/// "Load more" style controls
pub const LOAD_MORE_RULES: &[ElementRule] = &[
    ElementRule::with_text(CLICKABLE, TextMatch::Contains("load more")),
    ElementRule::with_text(CLICKABLE, TextMatch::Contains("show more")),
    ElementRule::with_text(CLICKABLE, TextMatch::Contains("see more")),
    ElementRule::with_text(CLICKABLE, TextMatch::Contains("view more")),
    ElementRule::css("[class*=\"load-more\"]"),
    ElementRule::css("[class*=\"loadmore\"]"),
    ElementRule::css("[class*=\"show-more\"]"),
    ElementRule::css("[class*=\"showmore\"]"),
    ElementRule::css("[class*=\"view-more\"]"),
    ElementRule::css("[data-action*=\"load\"]"),
    ElementRule::css("[data-action*=\"more\"]"),
];

/// Load-more candidates considered per rule
pub const LOAD_MORE_CANDIDATES_PER_RULE: usize = 3;

/// "Next page" links; the element's `href` is followed
pub const PAGINATION_RULES: &[ElementRule] = &[
    ElementRule::css("a[rel=\"next\"]"),
    ElementRule::css("link[rel=\"next\"]"),
    // Hacker News
    ElementRule::css("a.morelink"),
    ElementRule::with_text("a", TextMatch::Leading("next page")),
    ElementRule::with_text("a", TextMatch::Leading("next")),
    ElementRule::with_text("a", TextMatch::Leading("older")),
    ElementRule::with_text("a", TextMatch::Leading("›")),
    ElementRule::with_text("a", TextMatch::Leading("»")),
    ElementRule::css(".pagination a:last-child"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_case_and_space_insensitive() {
        assert!(TextMatch::Contains("load more").matches("  Load\n  More stories "));
        assert!(!TextMatch::Contains("load more").matches("Loading"));
    }

    #[test]
    fn leading_requires_word_boundary() {
        let next = TextMatch::Leading("next");
        assert!(next.matches("Next"));
        assert!(next.matches("Next ›"));
        assert!(!next.matches("Nextcloud pricing"));
        assert!(!next.matches("See what's next"));
    }

    #[test]
    fn rules_without_text_accept_anything() {
        assert!(TAB_RULES[0].accepts_text(""));
        assert!(!LOAD_MORE_RULES[0].accepts_text("Subscribe"));
        assert!(LOAD_MORE_RULES[0].accepts_text("Load more results"));
    }

    #[test]
    fn every_selector_parses() {
        for rule in TAB_RULES.iter().chain(LOAD_MORE_RULES).chain(PAGINATION_RULES) {
            assert!(
                scraper::Selector::parse(rule.selector).is_ok(),
                "selector failed to parse: {}",
                rule.selector
            );
        }
    }
}
