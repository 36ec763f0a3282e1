//! Result document types
//!
//! Everything here serializes to the camelCase JSON document returned by a scrape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::strategy::FetchStrategy;

/// Structural type of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Hero,
    Nav,
    Footer,
    Section,
    List,
    Grid,
    Faq,
    Pricing,
    Unknown,
}

impl SectionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Nav => "nav",
            Self::Footer => "footer",
            Self::Section => "section",
            Self::List => "list",
            Self::Grid => "grid",
            Self::Faq => "faq",
            Self::Pricing => "pricing",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub text: String,
    pub absolute_href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub absolute_src: String,
    pub alt: String,
}

/// Table as rows of cell text
pub type TableRows = Vec<Vec<String>>;

/// Extracted payload of one section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub headings: Vec<String>,
    pub text: String,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub lists: Vec<Vec<String>>,
    pub tables: Vec<TableRows>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// `type-ordinal`, unique within a result
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub label: String,
    pub source_url: String,
    pub content: ContentBlock,
    pub raw_html_snippet: String,
    pub truncated: bool,
}

impl Section {
    pub const ERROR_ID: &'static str = "error-0";
    pub const ERROR_LABEL: &'static str = "Error";

    /// The single section of a result that extracted nothing
    #[must_use]
    pub fn error_placeholder(source_url: &str, reason: &str) -> Self {
        Self {
            id: Self::ERROR_ID.to_string(),
            section_type: SectionType::Unknown,
            label: Self::ERROR_LABEL.to_string(),
            source_url: source_url.to_string(),
            content: ContentBlock {
                text: format!("Failed to scrape: {reason}"),
                ..ContentBlock::default()
            },
            raw_html_snippet: String::new(),
            truncated: false,
        }
    }

    #[must_use]
    pub fn is_error_placeholder(&self) -> bool {
        self.id == Self::ERROR_ID && self.label == Self::ERROR_LABEL
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub language: String,
    pub canonical: Option<String>,
    pub strategy: FetchStrategy,
}

impl PageMeta {
    pub const DEFAULT_LANGUAGE: &'static str = "en";

    /// Meta for a result with no parsed document
    #[must_use]
    pub fn empty(strategy: FetchStrategy) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            language: Self::DEFAULT_LANGUAGE.to_string(),
            canonical: None,
            strategy,
        }
    }
}

/// One successful activation during the interaction phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRecord {
    /// Rule selector the element was found by
    pub selector: String,
    /// Position among that selector's matches
    pub index: usize,
    pub text: String,
}

/// Append-only record of what the interaction controller did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionLog {
    pub clicks: Vec<ClickRecord>,
    pub scrolls: u32,
    /// Visited URLs in visit order, starting with the requested one
    pub pages: Vec<String>,
}

impl InteractionLog {
    #[must_use]
    pub fn starting_at(url: &str) -> Self {
        Self {
            pages: vec![url.to_string()],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_visited(&self, url: &str) -> bool {
        self.pages.iter().any(|p| p == url)
    }
}

/// A caught error, as reported in the result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub message: String,
    pub phase: String,
    /// Taxonomy name, e.g. `FetchError.forbidden`
    #[serde(rename = "type")]
    pub error_type: String,
}

impl ErrorRecord {
    pub fn new(
        phase: impl Into<String>,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            phase: phase.into(),
            error_type: error_type.into(),
        }
    }
}

/// The document returned for one scrape request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub url: String,
    /// ISO-8601 UTC
    pub scraped_at: String,
    pub meta: PageMeta,
    /// Never empty
    pub sections: Vec<Section>,
    pub interactions: InteractionLog,
    pub errors: Vec<ErrorRecord>,
}
