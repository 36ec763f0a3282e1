//! Infinite-scroll phase

use serde::Deserialize;
use tracing::{debug, info};

use super::InteractionController;
use crate::renderer::DriverError;
use crate::renderer::js_scripts::{CONTENT_FINGERPRINT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT};
use crate::scrape_engine::errors::{Phase, RenderError};

/// Consecutive unchanged iterations that end the scroll loop
pub const NO_CHANGE_LIMIT: u32 = 2;

/// Document height plus a count of content-bearing elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContentFingerprint {
    pub height: u64,
    pub items: u64,
}

impl ContentFingerprint {
    /// Read a fingerprint from a script result; anything unexpected reads as zero
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

impl InteractionController<'_> {
    async fn fingerprint(&self) -> Result<ContentFingerprint, DriverError> {
        let value = self.page.evaluate_script(CONTENT_FINGERPRINT_SCRIPT).await?;
        Ok(ContentFingerprint::from_value(value))
    }

    /// Scroll to the bottom until the content stops changing or `max_scrolls` is reached.
    pub(super) async fn scroll_phase(&mut self) -> Result<(), RenderError> {
        let mut unchanged = 0u32;

        for iteration in 1..=self.limits.max_scrolls {
            let before = match self.fingerprint().await {
                Ok(fp) => fp,
                Err(e) => return self.absorb(Phase::Interaction, e),
            };

            if let Err(e) = self.page.evaluate_script(SCROLL_TO_BOTTOM_SCRIPT).await {
                return self.absorb(Phase::Interaction, e);
            }
            self.log.scrolls += 1;
            self.settle().await?;

            let after = match self.fingerprint().await {
                Ok(fp) => fp,
                Err(e) => return self.absorb(Phase::Interaction, e),
            };

            if after == before {
                unchanged += 1;
                debug!("Scroll {} produced no new content ({} in a row)", iteration, unchanged);
                if unchanged >= NO_CHANGE_LIMIT {
                    info!("Content stable after {} scrolls, stopping", iteration);
                    break;
                }
            } else {
                unchanged = 0;
                debug!(
                    "Scroll {}: height {} -> {}, items {} -> {}",
                    iteration, before.height, after.height, before.items, after.items
                );
            }
        }

        Ok(())
    }
}
