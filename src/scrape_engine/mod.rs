//! Scrape orchestration
//!
//! Ties the fetch, render, interaction and extraction stages together and
//! maps every failure into the error taxonomy carried by `ScrapeResult`.

pub mod errors;
pub mod orchestrator;
pub mod page_timeout;

pub use errors::{ParseError, Phase, Recordable, RenderError, ScrapeError};
pub use orchestrator::{ScrapeEngine, scrape};
pub use page_timeout::with_page_timeout;
