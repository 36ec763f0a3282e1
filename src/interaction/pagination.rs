//! Pagination: next-link discovery and following

use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info};

use super::InteractionController;
use super::rules::{ElementRule, PAGINATION_RULES};
use crate::renderer::{DriverError, LoadMode};
use crate::scrape_engine::errors::{Phase, RenderError};
use crate::utils::{resolve_url, same_host};

static COMPILED_PAGINATION: LazyLock<Vec<(Selector, &'static ElementRule)>> =
    LazyLock::new(|| {
        PAGINATION_RULES
            .iter()
            .map(|rule| {
                let selector = Selector::parse(rule.selector)
                    .expect("BUG: hardcoded CSS selector in PAGINATION_RULES is invalid");
                (selector, rule)
            })
            .collect()
    });

/// First next-page link in a parsed document, resolved against `base_url`.
///
/// Links back to `base_url`, to anything in `visited`, or to another host
/// are ignored.
#[must_use]
pub fn find_next_link(html: &str, base_url: &str, visited: &[String]) -> Option<String> {
    let document = Html::parse_document(html);

    for (selector, rule) in COMPILED_PAGINATION.iter() {
        for element in document.select(selector) {
            let text: String = element.text().collect();
            if !rule.accepts_text(&text) {
                continue;
            }
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(url) = resolve_url(base_url, href) else {
                continue;
            };
            if url == base_url || visited.iter().any(|v| v == &url) {
                continue;
            }
            if !same_host(base_url, &url) {
                debug!("Ignoring off-site next link: {}", url);
                continue;
            }
            debug!("Next page via '{}': {}", rule.selector, url);
            return Some(url);
        }
    }

    None
}

impl InteractionController<'_> {
    /// Next unvisited page link on the live page.
    pub(super) async fn find_next_page(&self) -> Result<Option<String>, DriverError> {
        let current = self.page.current_url().await?;

        for rule in PAGINATION_RULES {
            let handles = self.page.query_all(rule.selector).await?;
            for handle in &handles {
                if !rule.accepts_text(&handle.text) {
                    continue;
                }
                let Some(url) = handle
                    .href
                    .as_deref()
                    .and_then(|href| resolve_url(&current, href))
                else {
                    continue;
                };
                if url == current || self.log.has_visited(&url) {
                    continue;
                }
                if !same_host(&current, &url) {
                    debug!("Ignoring off-site next link: {}", url);
                    continue;
                }
                debug!("Next page via '{}': {}", rule.selector, url);
                return Ok(Some(url));
            }
        }

        Ok(None)
    }

    /// Capture the current page, then follow next links until `max_pages` pages are captured.
    pub(super) async fn follow_pagination(&mut self, first: String) -> Result<(), RenderError> {
        self.snapshot().await?;
        let mut next = Some(first);

        while let Some(url) = next.take() {
            if self.log.pages.len() >= self.limits.max_pages {
                debug!("Page limit {} reached", self.limits.max_pages);
                break;
            }

            info!("Following pagination to {}", url);
            if let Err(e) = self.page.goto(&url, self.limits.page_timeout).await {
                let err = RenderError::from_load(e);
                if err.is_fatal() {
                    return Err(err);
                }
                self.record(Phase::Pagination, &err);
                break;
            }
            self.log.pages.push(url);

            if let Err(e) = self
                .page
                .wait_for_load(LoadMode::Load, self.limits.page_timeout)
                .await
            {
                if e.is_fatal() {
                    return Err(RenderError::from_load(e));
                }
                debug!("Load wait ended early, using current DOM: {}", e);
            }
            self.settle().await?;
            self.snapshot().await?;

            next = match self.find_next_page().await {
                Ok(next) => next,
                Err(e) => {
                    self.absorb(Phase::Pagination, e)?;
                    None
                }
            };
        }

        Ok(())
    }
}
