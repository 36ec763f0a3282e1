//! Core configuration types for scraping
//!
//! Holds the process-wide, read-only-after-construction knobs: timeouts,
//! interaction maxima and the extraction heuristics' thresholds.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::constants::{
    CHROME_USER_AGENT, DEFAULT_FRAMEWORK_TEXT_THRESHOLD, DEFAULT_INITIAL_RENDER_WAIT_MS,
    DEFAULT_MAX_LOAD_MORE_CLICKS, DEFAULT_MAX_PAGES, DEFAULT_MAX_RAW_HTML_LENGTH,
    DEFAULT_MAX_SCROLLS, DEFAULT_MAX_TAB_CLICKS, DEFAULT_MIN_BLOCK_TEXT_LENGTH,
    DEFAULT_MIN_LANDMARK_SECTIONS, DEFAULT_MIN_SECTIONS_BEFORE_HEADINGS,
    DEFAULT_MIN_STATIC_TEXT_LENGTH, DEFAULT_NETWORK_IDLE_TIMEOUT_MS,
    DEFAULT_NETWORK_QUIET_WINDOW_MS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_TIMEOUT_SECS,
};

/// Main configuration struct for scrape operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeConfig {
    /// Timeout in seconds for the static fetch and for `page.goto()`
    ///
    /// Default: 30 seconds
    pub(crate) timeout_secs: u64,

    /// Ceiling for the whole request. `None` leaves only the per-wait bounds.
    pub(crate) overall_timeout_secs: Option<u64>,

    /// Total pages visited, the first page included.
    ///
    /// Pagination follows at most `max_pages - 1` next links.
    pub(crate) max_pages: usize,

    pub(crate) max_scrolls: usize,
    pub(crate) max_tab_clicks: usize,

    /// "Load more" clicks allowed per distinct button signature
    pub(crate) max_load_more_clicks: usize,

    /// Character budget of `Section::raw_html_snippet`
    pub(crate) max_raw_html_length: usize,

    /// Visible text below this forces the rendered path
    pub(crate) min_static_text_length: usize,

    /// A framework fingerprint with visible text below this forces the rendered path
    pub(crate) framework_text_threshold: usize,

    pub(crate) min_landmark_sections: usize,
    pub(crate) min_sections_before_headings: usize,
    pub(crate) min_block_text_length: usize,

    /// Delay after each click or scroll before the DOM is read again
    pub(crate) settle_delay_ms: u64,

    /// Upper bound on one network-quiescence wait. Expiry is not an error.
    pub(crate) network_idle_timeout_ms: u64,

    /// How long the network must stay quiet to count as idle
    pub(crate) network_quiet_window_ms: u64,

    pub(crate) initial_render_wait_ms: u64,

    pub(crate) headless: bool,
    pub(crate) user_agent: String,

    /// Follow `rel="next"` links with plain HTTP when no rendering is needed
    pub(crate) follow_static_pagination: bool,

    /// Chrome user data directory for browser profile isolation
    #[serde(skip)]
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            overall_timeout_secs: None,
            max_pages: DEFAULT_MAX_PAGES,
            max_scrolls: DEFAULT_MAX_SCROLLS,
            max_tab_clicks: DEFAULT_MAX_TAB_CLICKS,
            max_load_more_clicks: DEFAULT_MAX_LOAD_MORE_CLICKS,
            max_raw_html_length: DEFAULT_MAX_RAW_HTML_LENGTH,
            min_static_text_length: DEFAULT_MIN_STATIC_TEXT_LENGTH,
            framework_text_threshold: DEFAULT_FRAMEWORK_TEXT_THRESHOLD,
            min_landmark_sections: DEFAULT_MIN_LANDMARK_SECTIONS,
            min_sections_before_headings: DEFAULT_MIN_SECTIONS_BEFORE_HEADINGS,
            min_block_text_length: DEFAULT_MIN_BLOCK_TEXT_LENGTH,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            network_idle_timeout_ms: DEFAULT_NETWORK_IDLE_TIMEOUT_MS,
            network_quiet_window_ms: DEFAULT_NETWORK_QUIET_WINDOW_MS,
            initial_render_wait_ms: DEFAULT_INITIAL_RENDER_WAIT_MS,
            headless: true,
            user_agent: CHROME_USER_AGENT.to_string(),
            follow_static_pagination: true,
            chrome_data_dir: None,
        }
    }
}
