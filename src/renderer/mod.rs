//! Browser-driver boundary
//!
//! The engine only talks to a rendered page through [`RenderedPage`], and
//! only obtains one through [`BrowserDriver`]. The Chromium implementation
//! lives in [`chromium`]; tests drive the engine through scripted fakes.

pub mod browser;
pub mod chromium;
pub mod js_scripts;
pub mod page_helpers;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub use browser::BrowserWrapper;
pub use chromium::{ChromiumDriver, ChromiumPage};

/// Failure at the driver boundary
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
    /// A bounded wait or a single command ran out of time
    #[error("Driver timeout: {0}")]
    Timeout(String),

    /// The element or node went away
    #[error("Element not found: {0}")]
    NotFound(String),

    /// The browser session is no longer usable
    #[error("Browser session crashed: {0}")]
    Crashed(String),

    /// Anything else the page reported (script exceptions, protocol errors)
    #[error("Driver error: {0}")]
    Script(String),
}

impl DriverError {
    /// Classify a driver error message.
    ///
    /// Transport-level failures mean the session is gone; everything the page
    /// itself reports is recoverable.
    #[must_use]
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let msg = message.to_lowercase();

        if msg.contains("websocket")
            || msg.contains("channel")
            || msg.contains("connection closed")
            || msg.contains("connection reset")
            || msg.contains("broken pipe")
            || msg.contains("browser closed")
            || msg.contains("browser has disconnected")
            || msg.contains("target closed")
            || msg.contains("session closed")
            || msg.contains("no response")
        {
            return Self::Crashed(message);
        }

        if msg.contains("timeout") || msg.contains("timed out") {
            return Self::Timeout(message);
        }

        if msg.contains("not found")
            || msg.contains("no node")
            || msg.contains("could not find node")
            || msg.contains("detached")
        {
            return Self::NotFound(message);
        }

        Self::Script(message)
    }

    /// Whether the session has to be abandoned
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Crashed(_))
    }
}

/// Which load milestone `wait_for_load` waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// `document.readyState` is `interactive` or `complete`
    DomContentLoaded,
    /// `document.readyState` is `complete`
    Load,
}

/// How an element is activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickStrategy {
    /// Scroll into view and click at the element's position
    Direct,
    /// Dispatch the pointer event sequence on the element, ignoring overlays
    Forced,
    /// Call `HTMLElement.click()` from script
    Script,
}

/// A queried element, with the facts the controller needs to pick it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementHandle {
    /// Page-scoped handle id used by `click`
    #[serde(skip)]
    pub id: usize,
    pub tag: String,
    /// Inner text, trimmed and capped
    pub text: String,
    pub aria_label: Option<String>,
    pub href: Option<String>,
    pub class_name: String,
    pub visible: bool,
    pub enabled: bool,
    /// Already selected/current (active tab, current page)
    pub active: bool,
    /// Structural path from the root, stable for the element's lifetime
    pub path: String,
}

impl ElementHandle {
    /// Human label for the interaction log
    #[must_use]
    pub fn label(&self, fallback: &str) -> String {
        let text = crate::utils::collapse_whitespace(&self.text);
        if !text.is_empty() {
            return crate::utils::safe_truncate_chars(&text, 40).to_string();
        }
        match self.aria_label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => {
                crate::utils::safe_truncate_chars(label, 40).to_string()
            }
            _ => fallback.to_string(),
        }
    }
}

/// One rendered page, exclusively owned by the request that opened it
#[async_trait]
pub trait RenderedPage: Send + Sync {
    /// Wait for a load milestone, bounded by `timeout`
    async fn wait_for_load(&self, mode: LoadMode, timeout: Duration) -> Result<(), DriverError>;

    /// Wait until no network activity is observed for the quiet window
    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<(), DriverError>;

    /// All elements matching `selector`, in document order
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, DriverError>;

    /// Activate a previously queried element
    async fn click(&self, element: &ElementHandle, strategy: ClickStrategy)
    -> Result<(), DriverError>;

    /// Evaluate a script expression and return its JSON value (`null` for undefined)
    async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value, DriverError>;

    /// Serialized DOM as currently rendered
    async fn rendered_html(&self) -> Result<String, DriverError>;

    async fn current_url(&self) -> Result<String, DriverError>;

    /// Navigate this page to `url`, bounded by `timeout`
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Release the page and its browser session
    async fn close(self: Box<Self>) -> Result<(), DriverError>;
}

/// Source of rendered pages
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Open `url` in a fresh session
    async fn open_page(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Box<dyn RenderedPage>, DriverError>;
}
