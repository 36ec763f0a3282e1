//! Getter methods for `ScrapeConfig`

use std::path::PathBuf;
use std::time::Duration;

use super::types::ScrapeConfig;

impl ScrapeConfig {
    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    #[must_use]
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn overall_timeout(&self) -> Option<Duration> {
        self.overall_timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    #[must_use]
    pub fn max_scrolls(&self) -> usize {
        self.max_scrolls
    }

    #[must_use]
    pub fn max_tab_clicks(&self) -> usize {
        self.max_tab_clicks
    }

    #[must_use]
    pub fn max_load_more_clicks(&self) -> usize {
        self.max_load_more_clicks
    }

    #[must_use]
    pub fn max_raw_html_length(&self) -> usize {
        self.max_raw_html_length
    }

    #[must_use]
    pub fn min_static_text_length(&self) -> usize {
        self.min_static_text_length
    }

    #[must_use]
    pub fn framework_text_threshold(&self) -> usize {
        self.framework_text_threshold
    }

    #[must_use]
    pub fn min_landmark_sections(&self) -> usize {
        self.min_landmark_sections
    }

    #[must_use]
    pub fn min_sections_before_headings(&self) -> usize {
        self.min_sections_before_headings
    }

    #[must_use]
    pub fn min_block_text_length(&self) -> usize {
        self.min_block_text_length
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn network_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.network_idle_timeout_ms)
    }

    #[must_use]
    pub fn network_quiet_window(&self) -> Duration {
        Duration::from_millis(self.network_quiet_window_ms)
    }

    #[must_use]
    pub fn initial_render_wait(&self) -> Duration {
        Duration::from_millis(self.initial_render_wait_ms)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn follow_static_pagination(&self) -> bool {
        self.follow_static_pagination
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }
}
