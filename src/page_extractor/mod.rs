//! Page data extraction.
//!
//! Turns a noise-filtered document into page metadata and an ordered list of
//! typed, labeled sections with bounded content.

// Sub-modules
pub mod classify;
pub mod content;
pub mod metadata;
pub mod schema;
pub mod segmenter;

// Re-exports for public API
pub use classify::{classify, derive_label};
pub use content::{extract_content, raw_html_snippet};
pub use metadata::extract_meta;
pub use schema::{
    ClickRecord, ContentBlock, ErrorRecord, Image, InteractionLog, Link, PageMeta, ScrapeResult,
    Section, SectionType,
};
pub use segmenter::{SegmentOptions, Tier, assign_section_ids, segment, segment_html};
