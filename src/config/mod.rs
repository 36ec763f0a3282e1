//! Configuration module for scraping
//!
//! This module provides the `ScrapeConfig` struct and its builder for
//! configuring a scrape request with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::ScrapeConfigBuilder;
pub use types::ScrapeConfig;
