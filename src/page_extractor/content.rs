//! Per-section content extraction with fixed bounds

use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::schema::{ContentBlock, Image, Link, TableRows};
use crate::utils::constants::{
    MAX_SECTION_IMAGES, MAX_SECTION_LINKS, MAX_SECTION_LISTS, MAX_SECTION_TABLES,
};
use crate::utils::{collapse_whitespace, resolve_url, safe_truncate_chars};

/// Link text used when an anchor has none
pub const EMPTY_LINK_TEXT: &str = "(no text)";

static HEADINGS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6")
        .expect("BUG: hardcoded CSS selector 'h1, h2, h3, h4, h5, h6' is invalid")
});
static LISTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("ul, ol").expect("BUG: hardcoded CSS selector 'ul, ol' is invalid")
});
static TABLES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table").expect("BUG: hardcoded CSS selector 'table' is invalid")
});
static ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("BUG: hardcoded CSS selector 'tr' is invalid"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid")
});
static IMAGES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("BUG: hardcoded CSS selector 'img' is invalid"));

/// Whitespace-normalized text of an element, text nodes joined by spaces
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn child_texts(element: ElementRef<'_>, names: &[&str]) -> Vec<String> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| names.contains(&child.value().name()))
        .map(element_text)
        .collect()
}

/// Extract the bounded content payload of `root`, resolving URLs against `source_url`.
#[must_use]
pub fn extract_content(root: ElementRef<'_>, source_url: &str) -> ContentBlock {
    let headings: Vec<String> = root
        .select(&HEADINGS)
        .map(element_text)
        .filter(|h| !h.is_empty())
        .collect();

    let lists: Vec<Vec<String>> = root
        .select(&LISTS)
        .map(|list| {
            child_texts(list, &["li"])
                .into_iter()
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|items| !items.is_empty())
        .take(MAX_SECTION_LISTS)
        .collect();

    let tables: Vec<TableRows> = root
        .select(&TABLES)
        .map(|table| {
            table
                .select(&ROWS)
                .map(|row| child_texts(row, &["td", "th"]))
                .filter(|cells| cells.iter().any(|c| !c.is_empty()))
                .collect::<TableRows>()
        })
        .filter(|rows| !rows.is_empty())
        .take(MAX_SECTION_TABLES)
        .collect();

    ContentBlock {
        headings,
        text: element_text(root),
        links: extract_links(root, source_url),
        images: extract_images(root, source_url),
        lists,
        tables,
    }
}

fn extract_links(root: ElementRef<'_>, source_url: &str) -> Vec<Link> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in root.select(&LINKS) {
        if links.len() >= MAX_SECTION_LINKS {
            break;
        }
        let Some(href) = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_url(source_url, href))
        else {
            continue;
        };
        if !seen.insert(href.clone()) {
            continue;
        }
        let text = element_text(anchor);
        links.push(Link {
            text: if text.is_empty() {
                EMPTY_LINK_TEXT.to_string()
            } else {
                text
            },
            absolute_href: href,
        });
    }

    links
}

fn extract_images(root: ElementRef<'_>, source_url: &str) -> Vec<Image> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for img in root.select(&IMAGES) {
        if images.len() >= MAX_SECTION_IMAGES {
            break;
        }
        let element = img.value();
        let src = element
            .attr("src")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| element.attr("data-src"));
        let Some(src) = src.and_then(|s| resolve_url(source_url, s)) else {
            continue;
        };
        if !seen.insert(src.clone()) {
            continue;
        }
        images.push(Image {
            absolute_src: src,
            alt: element.attr("alt").map(str::trim).unwrap_or_default().to_string(),
        });
    }

    images
}

/// Cap serialized markup at `max_chars` characters.
///
/// The flag is true iff the markup was longer than the cap.
#[must_use]
pub fn raw_html_snippet(markup: &str, max_chars: usize) -> (String, bool) {
    let truncated = markup.chars().count() > max_chars;
    (safe_truncate_chars(markup, max_chars).to_string(), truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn root_of(doc: &Html) -> ElementRef<'_> {
        doc.root_element()
    }

    #[test]
    fn resolves_and_dedupes_links() {
        let doc = Html::parse_document(
            r##"<body>
                <a href="/docs">Docs</a>
                <a href="https://example.com/docs">Docs again</a>
                <a href="//cdn.example.com/file.pdf"></a>
                <a href="#top">Top</a>
                <a href="mailto:hi@example.com">Mail</a>
                <a href="javascript:void(0)">JS</a>
            </body>"##,
        );
        let block = extract_content(root_of(&doc), "https://example.com/guide/");
        let hrefs: Vec<&str> = block.links.iter().map(|l| l.absolute_href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "https://example.com/docs",
                "https://cdn.example.com/file.pdf",
                "https://example.com/guide/#top",
            ]
        );
        assert_eq!(block.links[1].text, EMPTY_LINK_TEXT);
    }

    #[test]
    fn images_fall_back_to_data_src() {
        let doc = Html::parse_document(
            r#"<body><img data-src="/lazy.png" alt=" Lazy "><img src="a.png"><img src="a.png"></body>"#,
        );
        let block = extract_content(root_of(&doc), "https://example.com/");
        assert_eq!(block.images.len(), 2);
        assert_eq!(block.images[0].absolute_src, "https://example.com/lazy.png");
        assert_eq!(block.images[0].alt, "Lazy");
    }

    #[test]
    fn lists_and_tables_are_grouped() {
        let doc = Html::parse_document(
            "<body><ul><li>One</li><li> Two </li></ul><ol></ol>\
             <table><tr><th>Plan</th><th>Price</th></tr><tr><td>Pro</td><td>$9</td></tr></table></body>",
        );
        let block = extract_content(root_of(&doc), "https://example.com/");
        assert_eq!(block.lists, vec![vec!["One".to_string(), "Two".to_string()]]);
        assert_eq!(
            block.tables,
            vec![vec![
                vec!["Plan".to_string(), "Price".to_string()],
                vec!["Pro".to_string(), "$9".to_string()],
            ]]
        );
    }

    #[test]
    fn link_bound_is_enforced() {
        let anchors: String = (0..80)
            .map(|i| format!("<a href=\"/p/{i}\">p{i}</a>"))
            .collect();
        let doc = Html::parse_document(&format!("<body>{anchors}</body>"));
        let block = extract_content(root_of(&doc), "https://example.com/");
        assert_eq!(block.links.len(), MAX_SECTION_LINKS);
    }

    #[test]
    fn snippet_cap_and_flag() {
        let markup = "x".repeat(5000);
        let (snippet, truncated) = raw_html_snippet(&markup, 2000);
        assert_eq!(snippet.chars().count(), 2000);
        assert!(truncated);

        let (snippet, truncated) = raw_html_snippet("<p>hi</p>", 2000);
        assert_eq!(snippet, "<p>hi</p>");
        assert!(!truncated);
    }
}
