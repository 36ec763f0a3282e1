//! Page-level metadata

use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::schema::PageMeta;
use crate::strategy::FetchStrategy;
use crate::utils::{collapse_whitespace, resolve_url};

macro_rules! static_selector {
    ($name:ident, $css:literal) => {
        static $name: LazyLock<Selector> = LazyLock::new(|| {
            Selector::parse($css).expect(concat!("BUG: hardcoded CSS selector '", $css, "' is invalid"))
        });
    };
}

static_selector!(TITLE, "title");
static_selector!(OG_TITLE, "meta[property=\"og:title\"]");
static_selector!(DESCRIPTION, "meta[name=\"description\"]");
static_selector!(OG_DESCRIPTION, "meta[property=\"og:description\"]");
static_selector!(HTML_LANG, "html[lang]");
static_selector!(CANONICAL, "link[rel=\"canonical\"]");

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(str::to_string)
}

/// Title, description, language, and canonical URL of a parsed page.
#[must_use]
pub fn extract_meta(document: &Html, base_url: &str, strategy: FetchStrategy) -> PageMeta {
    let title = document
        .select(&TITLE)
        .next()
        .map(|t| collapse_whitespace(&t.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .or_else(|| meta_content(document, &OG_TITLE))
        .unwrap_or_default();

    let description = meta_content(document, &DESCRIPTION)
        .or_else(|| meta_content(document, &OG_DESCRIPTION))
        .unwrap_or_default();

    let language = document
        .select(&HTML_LANG)
        .next()
        .and_then(|el| el.value().attr("lang"))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(PageMeta::DEFAULT_LANGUAGE)
        .to_string();

    let canonical = document
        .select(&CANONICAL)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| resolve_url(base_url, href));

    PageMeta {
        title,
        description,
        language,
        canonical,
        strategy,
    }
}
