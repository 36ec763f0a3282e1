//! Tab and "load more" phases

use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::InteractionController;
use super::click::{ClickOutcome, click_with_escalation};
use super::rules::{
    LOAD_MORE_CANDIDATES_PER_RULE, LOAD_MORE_RULES, TAB_CANDIDATES_PER_RULE, TAB_RULES,
};
use crate::renderer::ElementHandle;
use crate::scrape_engine::errors::{Phase, RenderError};
use crate::utils::collapse_whitespace;

/// Identity of an element across queries
fn element_key(handle: &ElementHandle) -> String {
    if handle.path.is_empty() {
        format!("{}|{}", handle.tag, collapse_whitespace(&handle.text))
    } else {
        handle.path.clone()
    }
}

/// Buttons that re-render with the same tag and text count as one button
fn button_signature(handle: &ElementHandle) -> String {
    format!(
        "{}|{}",
        handle.tag,
        collapse_whitespace(&handle.text).to_lowercase()
    )
}

impl InteractionController<'_> {
    /// Activate inactive tabs, up to `max_tab_clicks`.
    pub(super) async fn tab_phase(&mut self) -> Result<(), RenderError> {
        let max = self.limits.max_tab_clicks;
        let mut clicked = 0usize;
        let mut seen: HashSet<String> = HashSet::new();

        'rules: for rule in TAB_RULES {
            if clicked >= max {
                break;
            }

            let handles = match self.page.query_all(rule.selector).await {
                Ok(handles) => handles,
                Err(e) => {
                    self.absorb(Phase::Interaction, e)?;
                    break;
                }
            };

            for (index, handle) in handles.iter().enumerate().take(TAB_CANDIDATES_PER_RULE) {
                if clicked >= max {
                    break 'rules;
                }
                if !handle.visible || !handle.enabled || handle.active {
                    continue;
                }
                if !seen.insert(element_key(handle)) {
                    continue;
                }

                match click_with_escalation(self.page, handle, self.limits.click_timeout).await {
                    Ok(ClickOutcome::Clicked(_)) => {
                        clicked += 1;
                        let label = handle.label(&format!("element-{index}"));
                        self.log_click(rule.selector, index, label);
                        self.settle().await?;
                    }
                    Ok(ClickOutcome::Exhausted(_)) => {
                        debug!("Skipping tab candidate {}[{}]", rule.selector, index);
                    }
                    Err(e) => return Err(RenderError::from_interaction(e)),
                }
            }
        }

        debug!("Tab phase done: {} activations", clicked);
        Ok(())
    }

    /// Click "load more" controls in rounds until nothing new is clicked.
    ///
    /// Each distinct button signature is clicked at most `max_load_more_clicks`
    /// times, so the number of rounds is bounded by the same value.
    pub(super) async fn load_more_phase(&mut self) -> Result<(), RenderError> {
        let per_signature = self.limits.max_load_more_clicks;
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut given_up: HashSet<String> = HashSet::new();

        for round in 0..per_signature {
            let mut clicked_this_round: HashSet<String> = HashSet::new();

            for rule in LOAD_MORE_RULES {
                let handles = match self.page.query_all(rule.selector).await {
                    Ok(handles) => handles,
                    Err(e) => return self.absorb(Phase::Interaction, e),
                };

                let candidates = handles
                    .iter()
                    .enumerate()
                    .filter(|(_, h)| rule.accepts_text(&h.text))
                    .take(LOAD_MORE_CANDIDATES_PER_RULE);

                for (index, handle) in candidates {
                    if !handle.visible || !handle.enabled {
                        continue;
                    }
                    let signature = button_signature(handle);
                    if given_up.contains(&signature)
                        || clicked_this_round.contains(&signature)
                        || counts.get(&signature).copied().unwrap_or(0) >= per_signature
                    {
                        continue;
                    }

                    match click_with_escalation(self.page, handle, self.limits.click_timeout)
                        .await
                    {
                        Ok(ClickOutcome::Clicked(_)) => {
                            *counts.entry(signature.clone()).or_default() += 1;
                            clicked_this_round.insert(signature);
                            let label = handle.label("load-more");
                            self.log_click(rule.selector, index, label);
                            self.settle().await?;
                        }
                        Ok(ClickOutcome::Exhausted(_)) => {
                            debug!("Giving up on load-more control '{}'", signature);
                            given_up.insert(signature);
                        }
                        Err(e) => return Err(RenderError::from_interaction(e)),
                    }
                }
            }

            if clicked_this_round.is_empty() {
                debug!("Load-more phase done after {} rounds", round + 1);
                break;
            }
        }

        Ok(())
    }
}
