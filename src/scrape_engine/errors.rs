//! Error taxonomy for a scrape
//!
//! Every error is caught at the phase where it happens and turned into an
//! [`ErrorRecord`]; none escapes [`super::ScrapeEngine::scrape`].

use std::fmt;
use thiserror::Error;

use crate::fetch::FetchError;
use crate::page_extractor::ErrorRecord;
use crate::renderer::DriverError;

/// Pipeline phase an error is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    StaticFetch,
    Render,
    Interaction,
    Pagination,
    NoiseFilter,
    Segmentation,
    Scrape,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StaticFetch => "static-fetch",
            Self::Render => "render",
            Self::Interaction => "interaction",
            Self::Pagination => "pagination",
            Self::NoiseFilter => "noise-filter",
            Self::Segmentation => "segmentation",
            Self::Scrape => "scrape",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can be reported as `Family.kind` records
pub trait Recordable: fmt::Display {
    /// Taxonomy family, e.g. `FetchError`
    const FAMILY: &'static str;

    fn kind(&self) -> &'static str;

    fn to_record(&self, phase: Phase) -> ErrorRecord {
        ErrorRecord::new(
            phase.as_str(),
            format!("{}.{}", Self::FAMILY, self.kind()),
            self.to_string(),
        )
    }
}

impl Recordable for FetchError {
    const FAMILY: &'static str = "FetchError";

    fn kind(&self) -> &'static str {
        self.kind_name()
    }
}

/// Rendered-path failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Page load timed out: {0}")]
    LoadTimeout(String),

    #[error("Interaction timed out: {0}")]
    InteractionTimeout(String),

    /// The browser session is unusable; the rendered path is abandoned
    #[error("Browser driver crashed: {0}")]
    DriverCrash(String),

    #[error("Interaction failed: {0}")]
    InteractionFailed(String),
}

impl RenderError {
    /// Map a driver error raised while loading or navigating
    #[must_use]
    pub fn from_load(err: DriverError) -> Self {
        match err {
            DriverError::Crashed(msg) => Self::DriverCrash(msg),
            DriverError::Timeout(msg) => Self::LoadTimeout(msg),
            DriverError::NotFound(msg) | DriverError::Script(msg) => Self::LoadTimeout(msg),
        }
    }

    /// Map a driver error raised while interacting with an open page
    #[must_use]
    pub fn from_interaction(err: DriverError) -> Self {
        match err {
            DriverError::Crashed(msg) => Self::DriverCrash(msg),
            DriverError::Timeout(msg) => Self::InteractionTimeout(msg),
            DriverError::NotFound(msg) | DriverError::Script(msg) => Self::InteractionFailed(msg),
        }
    }

    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DriverCrash(_))
    }
}

impl Recordable for RenderError {
    const FAMILY: &'static str = "RenderError";

    fn kind(&self) -> &'static str {
        match self {
            Self::LoadTimeout(_) => "loadTimeout",
            Self::InteractionTimeout(_) => "interactionTimeout",
            Self::DriverCrash(_) => "driverCrash",
            Self::InteractionFailed(_) => "interactionFailed",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

impl Recordable for ParseError {
    const FAMILY: &'static str = "ParseError";

    fn kind(&self) -> &'static str {
        match self {
            Self::MalformedDocument(_) => "malformedDocument",
        }
    }
}

/// Any error the engine can record
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ScrapeError {
    #[must_use]
    pub fn to_record(&self, phase: Phase) -> ErrorRecord {
        match self {
            Self::Fetch(e) => e.to_record(phase),
            Self::Render(e) => e.to_record(phase),
            Self::Parse(e) => e.to_record(phase),
        }
    }
}
