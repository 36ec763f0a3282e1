//! Builder for `ScrapeConfig`
//!
//! All fields have defaults, so the builder only validates: `build()`
//! rejects combinations the engine cannot honor.

use anyhow::{Result, anyhow};

use super::types::ScrapeConfig;

/// Largest accepted per page-load timeout
const MAX_TIMEOUT_SECS: u64 = 300;

/// Fluent builder over a default `ScrapeConfig`
#[derive(Debug, Clone, Default)]
pub struct ScrapeConfigBuilder {
    pub(crate) config: ScrapeConfig,
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::default()
    }

    /// Check the invariants `build()` enforces.
    ///
    /// Exposed so configs that arrive through serde can be checked too.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(anyhow!(
                "timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}, got {}",
                self.timeout_secs
            ));
        }
        if self.overall_timeout_secs == Some(0) {
            return Err(anyhow!("overall_timeout_secs must be at least 1 when set"));
        }
        if self.max_pages == 0 {
            return Err(anyhow!("max_pages must be at least 1"));
        }
        if self.max_raw_html_length == 0 {
            return Err(anyhow!("max_raw_html_length must be at least 1"));
        }
        if self.min_static_text_length > self.framework_text_threshold {
            return Err(anyhow!(
                "min_static_text_length ({}) must not exceed framework_text_threshold ({})",
                self.min_static_text_length,
                self.framework_text_threshold
            ));
        }
        if self.min_landmark_sections == 0 {
            return Err(anyhow!("min_landmark_sections must be at least 1"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(anyhow!("user_agent must not be empty"));
        }
        Ok(())
    }
}

impl ScrapeConfigBuilder {
    /// Validate and produce the final config
    pub fn build(self) -> Result<ScrapeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ScrapeConfig::default().validate().is_ok());
        assert!(ScrapeConfig::builder().build().is_ok());
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = ScrapeConfig::builder().timeout_secs(0).build();
        assert!(err.is_err());
    }

    #[test]
    fn rejects_inverted_text_thresholds() {
        let err = ScrapeConfig::builder()
            .min_static_text_length(3000)
            .framework_text_threshold(2000)
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn zero_interaction_maxima_disable_phases() {
        let config = ScrapeConfig::builder()
            .max_scrolls(0)
            .max_tab_clicks(0)
            .max_load_more_clicks(0)
            .build()
            .unwrap();
        assert_eq!(config.max_scrolls(), 0);
        assert_eq!(config.max_tab_clicks(), 0);
    }
}
