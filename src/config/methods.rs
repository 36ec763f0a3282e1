//! Builder setter methods
//!
//! One setter per configuration field. Validation happens in `build()`.

use std::path::PathBuf;

use super::builder::ScrapeConfigBuilder;

impl ScrapeConfigBuilder {
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Abort the whole request after this many seconds
    ///
    /// When the deadline passes the engine still returns a valid
    /// `ScrapeResult`, carrying the error section.
    #[must_use]
    pub fn overall_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.overall_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn max_pages(mut self, pages: usize) -> Self {
        self.config.max_pages = pages;
        self
    }

    #[must_use]
    pub fn max_scrolls(mut self, scrolls: usize) -> Self {
        self.config.max_scrolls = scrolls;
        self
    }

    #[must_use]
    pub fn max_tab_clicks(mut self, clicks: usize) -> Self {
        self.config.max_tab_clicks = clicks;
        self
    }

    #[must_use]
    pub fn max_load_more_clicks(mut self, clicks: usize) -> Self {
        self.config.max_load_more_clicks = clicks;
        self
    }

    #[must_use]
    pub fn max_raw_html_length(mut self, chars: usize) -> Self {
        self.config.max_raw_html_length = chars;
        self
    }

    #[must_use]
    pub fn min_static_text_length(mut self, chars: usize) -> Self {
        self.config.min_static_text_length = chars;
        self
    }

    #[must_use]
    pub fn framework_text_threshold(mut self, chars: usize) -> Self {
        self.config.framework_text_threshold = chars;
        self
    }

    #[must_use]
    pub fn min_landmark_sections(mut self, count: usize) -> Self {
        self.config.min_landmark_sections = count;
        self
    }

    #[must_use]
    pub fn min_sections_before_headings(mut self, count: usize) -> Self {
        self.config.min_sections_before_headings = count;
        self
    }

    #[must_use]
    pub fn min_block_text_length(mut self, chars: usize) -> Self {
        self.config.min_block_text_length = chars;
        self
    }

    #[must_use]
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.config.settle_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn network_idle_timeout_ms(mut self, ms: u64) -> Self {
        self.config.network_idle_timeout_ms = ms;
        self
    }

    #[must_use]
    pub fn network_quiet_window_ms(mut self, ms: u64) -> Self {
        self.config.network_quiet_window_ms = ms;
        self
    }

    #[must_use]
    pub fn initial_render_wait_ms(mut self, ms: u64) -> Self {
        self.config.initial_render_wait_ms = ms;
        self
    }

    /// Set browser headless mode
    ///
    /// Headed mode needs a display server and is only useful for debugging
    /// interaction rules against a live page.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn follow_static_pagination(mut self, follow: bool) -> Self {
        self.config.follow_static_pagination = follow;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.chrome_data_dir = dir;
        self
    }
}
