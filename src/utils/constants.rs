//! Shared configuration constants for adaptive_scrape
//!
//! Default values for the configuration surface live here so the builder,
//! the `Default` impl and the CLI agree on them.

/// Per page-load ceiling for both the static fetch and the rendered load
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Total pages visited per request, the first page included
pub const DEFAULT_MAX_PAGES: usize = 3;

/// Infinite-scroll iteration ceiling
pub const DEFAULT_MAX_SCROLLS: usize = 5;

/// Tab activation ceiling
pub const DEFAULT_MAX_TAB_CLICKS: usize = 8;

/// "Load more" clicks allowed per distinct button signature
pub const DEFAULT_MAX_LOAD_MORE_CLICKS: usize = 3;

/// Per-section raw markup cap, in characters
pub const DEFAULT_MAX_RAW_HTML_LENGTH: usize = 2000;

/// Visible text below this many characters means the page needs rendering
pub const DEFAULT_MIN_STATIC_TEXT_LENGTH: usize = 500;

/// A framework fingerprint plus visible text below this means the page needs rendering
pub const DEFAULT_FRAMEWORK_TEXT_THRESHOLD: usize = 2000;

/// Landmark tier output is accepted as final at this many sections
pub const DEFAULT_MIN_LANDMARK_SECTIONS: usize = 5;

/// The heading tier only runs while fewer sections than this exist
pub const DEFAULT_MIN_SECTIONS_BEFORE_HEADINGS: usize = 3;

/// Minimum text for a content block to become a section
pub const DEFAULT_MIN_BLOCK_TEXT_LENGTH: usize = 50;

/// Delay after each interaction or scroll before reading the DOM
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

/// Cap on a single network-quiescence wait
pub const DEFAULT_NETWORK_IDLE_TIMEOUT_MS: u64 = 5000;

/// No new network activity for this long counts as idle
pub const DEFAULT_NETWORK_QUIET_WINDOW_MS: u64 = 500;

/// Extra wait after the first rendered load for late scripts
pub const DEFAULT_INITIAL_RENDER_WAIT_MS: u64 = 2000;

/// Ceiling for a single click attempt
pub const CLICK_ATTEMPT_TIMEOUT_MS: u64 = 3000;

/// Per-section content bounds. Overflow is truncated silently.
pub const MAX_SECTION_LINKS: usize = 50;
pub const MAX_SECTION_IMAGES: usize = 20;
pub const MAX_SECTION_LISTS: usize = 10;
pub const MAX_SECTION_TABLES: usize = 5;

/// Chrome user agent string used for the static fetch and the browser
///
/// Keep both paths on the same UA so servers do not hand the rendered path
/// a different document than the static one.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
