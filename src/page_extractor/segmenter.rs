//! Segmentation into typed sections
//!
//! Four tiers run in order, each only when the sections found so far are too
//! few: landmarks, content blocks, headings, then the whole body. Tiers share
//! a claimed-element set so no element becomes two sections through
//! different tiers. Output is in document order.

use ego_tree::NodeId;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

use super::classify::{classify, derive_label, type_for_tag};
use super::content::{element_text, extract_content, raw_html_snippet};
use super::schema::{Section, SectionType};
use crate::config::ScrapeConfig;
use crate::utils::constants::{
    DEFAULT_MAX_RAW_HTML_LENGTH, DEFAULT_MIN_BLOCK_TEXT_LENGTH, DEFAULT_MIN_LANDMARK_SECTIONS,
    DEFAULT_MIN_SECTIONS_BEFORE_HEADINGS,
};

pub const LANDMARK_SELECTOR: &str = "header, nav, main, section, article, aside, footer";

/// Content-ish containers, including Hacker News story rows
pub const CONTENT_BLOCK_SELECTOR: &str = "article, div[class*=\"post\"], div[class*=\"item\"], \
     div[class*=\"card\"], div[class*=\"content\"], div[class*=\"story\"], tr.athing";

const HEADING_SELECTOR: &str = "h1, h2, h3";

static LANDMARKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(LANDMARK_SELECTOR).expect("BUG: hardcoded LANDMARK_SELECTOR is invalid")
});
static CONTENT_BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(CONTENT_BLOCK_SELECTOR).expect("BUG: hardcoded CONTENT_BLOCK_SELECTOR is invalid")
});
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(HEADING_SELECTOR).expect("BUG: hardcoded CSS selector 'h1, h2, h3' is invalid")
});
static BODY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid")
});

/// Tier thresholds and the snippet cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentOptions {
    /// Landmark output is final at or above this count
    pub min_landmark_sections: usize,
    /// Heading tier runs while fewer sections than this exist
    pub min_sections_before_headings: usize,
    pub min_block_text_length: usize,
    pub max_raw_html_length: usize,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            min_landmark_sections: DEFAULT_MIN_LANDMARK_SECTIONS,
            min_sections_before_headings: DEFAULT_MIN_SECTIONS_BEFORE_HEADINGS,
            min_block_text_length: DEFAULT_MIN_BLOCK_TEXT_LENGTH,
            max_raw_html_length: DEFAULT_MAX_RAW_HTML_LENGTH,
        }
    }
}

impl From<&ScrapeConfig> for SegmentOptions {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            min_landmark_sections: config.min_landmark_sections(),
            min_sections_before_headings: config.min_sections_before_headings(),
            min_block_text_length: config.min_block_text_length(),
            max_raw_html_length: config.max_raw_html_length(),
        }
    }
}

/// Segmentation strategies, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Landmark,
    ContentBlock,
    Heading,
    WholeDocument,
}

impl Tier {
    pub const PIPELINE: [Tier; 4] = [
        Tier::Landmark,
        Tier::ContentBlock,
        Tier::Heading,
        Tier::WholeDocument,
    ];

    /// Whether this tier runs given how many sections earlier tiers produced
    #[must_use]
    pub fn should_run(self, found: usize, options: &SegmentOptions) -> bool {
        match self {
            Tier::Landmark => true,
            Tier::ContentBlock => found < options.min_landmark_sections,
            Tier::Heading => found < options.min_sections_before_headings,
            Tier::WholeDocument => found == 0,
        }
    }
}

struct Segmentation<'a> {
    document: &'a Html,
    source_url: &'a str,
    options: &'a SegmentOptions,
    claimed: HashSet<NodeId>,
    /// Preorder position of every node
    order: HashMap<NodeId, usize>,
    found: Vec<(usize, Section)>,
}

impl<'a> Segmentation<'a> {
    fn new(document: &'a Html, source_url: &'a str, options: &'a SegmentOptions) -> Self {
        let order = document
            .tree
            .root()
            .descendants()
            .enumerate()
            .map(|(i, node)| (node.id(), i))
            .collect();
        Self {
            document,
            source_url,
            options,
            claimed: HashSet::new(),
            order,
            found: Vec::new(),
        }
    }

    fn position(&self, id: NodeId) -> usize {
        self.order.get(&id).copied().unwrap_or(usize::MAX)
    }

    fn run(&mut self, tier: Tier) {
        let before = self.found.len();
        match tier {
            Tier::Landmark => self.landmarks(),
            Tier::ContentBlock => self.content_blocks(),
            Tier::Heading => self.headings(),
            Tier::WholeDocument => self.whole_document(),
        }
        debug!(
            "{:?} tier added {} sections ({} total)",
            tier,
            self.found.len() - before,
            self.found.len()
        );
    }

    /// Build a section from `root`; `None` when it has no text
    fn build(
        &self,
        root: ElementRef<'_>,
        typed_by: ElementRef<'_>,
        markup: &str,
        section_type: SectionType,
    ) -> Option<Section> {
        let content = extract_content(root, self.source_url);
        if content.text.is_empty() {
            return None;
        }
        let label = derive_label(typed_by, &content.headings, &content.text);
        let (raw_html_snippet, truncated) =
            raw_html_snippet(markup, self.options.max_raw_html_length);
        Some(Section {
            id: String::new(),
            section_type,
            label,
            source_url: self.source_url.to_string(),
            content,
            raw_html_snippet,
            truncated,
        })
    }

    fn push_element(&mut self, element: ElementRef<'_>, default: SectionType) {
        let section_type = classify(element, default);
        if let Some(section) = self.build(element, element, &element.html(), section_type) {
            let position = self.position(element.id());
            self.found.push((position, section));
        }
    }

    fn landmarks(&mut self) {
        let document = self.document;
        for element in document.select(&LANDMARKS) {
            if !self.claimed.insert(element.id()) {
                continue;
            }
            let default = type_for_tag(element.value().name()).unwrap_or(SectionType::Section);
            self.push_element(element, default);
        }
    }

    fn content_blocks(&mut self) {
        let document = self.document;
        for element in document.select(&CONTENT_BLOCKS) {
            if self.claimed.contains(&element.id()) {
                continue;
            }
            if element_text(element).chars().count() < self.options.min_block_text_length {
                continue;
            }
            self.claimed.insert(element.id());
            self.push_element(element, SectionType::Section);
        }
    }

    fn headings(&mut self) {
        let document = self.document;
        for heading in document.select(&HEADINGS) {
            if !self.claimed.insert(heading.id()) {
                continue;
            }
            let Some(level) = heading_level(heading.value().name()) else {
                continue;
            };

            let markup = heading_section_markup(heading, level);
            let fragment = Html::parse_fragment(&markup);
            let section_type = classify(heading, SectionType::Section);
            if let Some(section) =
                self.build(fragment.root_element(), heading, &markup, section_type)
            {
                let position = self.position(heading.id());
                self.found.push((position, section));
            }
        }
    }

    fn whole_document(&mut self) {
        let document = self.document;
        let body = document
            .select(&BODY)
            .next()
            .unwrap_or_else(|| document.root_element());
        if let Some(section) = self.build(body, body, &body.html(), SectionType::Unknown) {
            let position = self.position(body.id());
            self.found.push((position, section));
        }
    }

    fn finish(mut self) -> Vec<Section> {
        self.found.sort_by_key(|(position, _)| *position);
        let mut sections: Vec<Section> = self.found.into_iter().map(|(_, s)| s).collect();
        assign_section_ids(&mut sections);
        sections
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        _ => None,
    }
}

/// Whether `element` is, or contains, a heading at `level` or above
fn closes_heading_section(element: ElementRef<'_>, level: u8) -> bool {
    if heading_level(element.value().name()).is_some_and(|l| l <= level) {
        return true;
    }
    element
        .select(&HEADINGS)
        .any(|h| heading_level(h.value().name()).is_some_and(|l| l <= level))
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The heading's markup followed by its siblings up to the next heading of the same or higher rank
fn heading_section_markup(heading: ElementRef<'_>, level: u8) -> String {
    let mut markup = heading.html();
    for sibling in heading.next_siblings() {
        if let Some(element) = ElementRef::wrap(sibling) {
            if closes_heading_section(element, level) {
                break;
            }
            markup.push_str(&element.html());
        } else if let Node::Text(text) = sibling.value() {
            markup.push_str(&escape_text(text));
        }
    }
    markup
}

/// Number sections `type-ordinal`, counting separately per type.
///
/// The error placeholder keeps its fixed id.
pub fn assign_section_ids(sections: &mut [Section]) {
    let mut counters: HashMap<SectionType, usize> = HashMap::new();
    for section in sections.iter_mut() {
        if section.is_error_placeholder() {
            continue;
        }
        let ordinal = counters.entry(section.section_type).or_default();
        section.id = format!("{}-{}", section.section_type, ordinal);
        *ordinal += 1;
    }
}

/// Segment a parsed, noise-filtered document.
#[must_use]
pub fn segment(document: &Html, source_url: &str, options: &SegmentOptions) -> Vec<Section> {
    let mut segmentation = Segmentation::new(document, source_url, options);
    for tier in Tier::PIPELINE {
        if tier.should_run(segmentation.found.len(), options) {
            segmentation.run(tier);
        }
    }
    segmentation.finish()
}

/// Parse and segment an HTML string.
#[must_use]
pub fn segment_html(html: &str, source_url: &str, options: &SegmentOptions) -> Vec<Section> {
    segment(&Html::parse_document(html), source_url, options)
}
