//! Fallback/result orchestrator
//!
//! Sequences one scrape: static fetch, strategy choice, rendered or static
//! page collection, noise filtering, segmentation, and assembly. Every error
//! is caught at its phase and recorded; a structurally valid
//! [`ScrapeResult`] is always returned.

use chrono::{SecondsFormat, Utc};
use scraper::Html;
use tracing::{debug, info, warn};

use super::errors::{ParseError, Phase, Recordable, RenderError};
use super::page_timeout::with_page_timeout;
use crate::config::ScrapeConfig;
use crate::fetch::{FetchError, StaticFetcher, StaticPage};
use crate::interaction::{
    InteractionController, InteractionLimits, InteractionOutcome, PageSnapshot, find_next_link,
};
use crate::noise_filter;
use crate::page_extractor::{
    ErrorRecord, InteractionLog, PageMeta, ScrapeResult, Section, SegmentOptions,
    assign_section_ids, extract_meta, segment,
};
use crate::renderer::{BrowserDriver, ChromiumDriver, LoadMode, RenderedPage};
use crate::strategy::{self, DensityThresholds, FetchOutcome, FetchStrategy};
use crate::utils::normalize_start_url;

/// Pages collected for one request, before extraction
struct Collected {
    strategy: FetchStrategy,
    pages: Vec<PageSnapshot>,
    log: InteractionLog,
    errors: Vec<ErrorRecord>,
}

/// Scrape engine over a browser driver
pub struct ScrapeEngine<D: BrowserDriver> {
    config: ScrapeConfig,
    fetcher: StaticFetcher,
    driver: D,
}

impl ScrapeEngine<ChromiumDriver> {
    /// Engine that renders with a locally found or downloaded Chromium.
    pub fn with_chromium(config: ScrapeConfig) -> anyhow::Result<Self> {
        let driver = ChromiumDriver::from_config(&config);
        Self::new(config, driver)
    }
}

impl<D: BrowserDriver> ScrapeEngine<D> {
    pub fn new(config: ScrapeConfig, driver: D) -> anyhow::Result<Self> {
        let fetcher = StaticFetcher::new(config.timeout_secs(), config.user_agent())?;
        Ok(Self {
            config,
            fetcher,
            driver,
        })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Scrape one URL. Never fails: errors end up in `ScrapeResult::errors`.
    pub async fn scrape(&self, url: &str) -> ScrapeResult {
        let url = normalize_start_url(url);
        info!("Scraping {}", url);

        let Some(limit) = self.config.overall_timeout() else {
            return self.run(&url).await;
        };

        match tokio::time::timeout(limit, self.run(&url)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Scrape of {} exceeded {}s", url, limit.as_secs());
                let record = FetchError::Timeout(limit.as_secs()).to_record(Phase::Scrape);
                error_result(
                    &url,
                    InteractionLog::starting_at(&url),
                    vec![record],
                )
            }
        }
    }

    async fn run(&self, url: &str) -> ScrapeResult {
        let collected = self.collect(url).await;
        self.assemble(url, collected)
    }

    async fn collect(&self, url: &str) -> Collected {
        let mut errors = Vec::new();

        let static_page = match self.fetcher.fetch(url).await {
            Ok(page) => Ok(page),
            Err(err) => {
                warn!("Static fetch of {} failed: {}", url, err);
                errors.push(err.to_record(Phase::StaticFetch));
                Err(err)
            }
        };

        let outcome = match &static_page {
            Ok(page) => FetchOutcome::Fetched { html: &page.html },
            Err(err) => FetchOutcome::Failed(err),
        };
        let decision = strategy::decide(url, outcome, DensityThresholds::from(&self.config));
        info!(
            strategy = %decision.strategy,
            reason = %decision.reason,
            "Selected fetch strategy"
        );

        let static_page = static_page.ok();

        if !decision.strategy.is_rendered() {
            return self.collect_static(url, static_page, errors).await;
        }

        let mut log = InteractionLog::starting_at(url);
        let failure = match self.render(url, &mut errors).await {
            Ok(outcome) => {
                log = outcome.log;
                errors.extend(outcome.errors);
                match outcome.failure {
                    None if !outcome.pages.is_empty() => {
                        return Collected {
                            strategy: decision.strategy,
                            pages: outcome.pages,
                            log,
                            errors,
                        };
                    }
                    None => RenderError::InteractionFailed(
                        "no rendered HTML could be captured".to_string(),
                    ),
                    Some(failure) => failure,
                }
            }
            Err(failure) => failure,
        };

        warn!("Rendered path failed for {}: {}", url, failure);
        errors.push(failure.to_record(Phase::Render));

        let strategy = strategy::after_render_failure(static_page.is_some());
        let pages = static_page
            .map(|page| {
                vec![PageSnapshot {
                    url: page.final_url,
                    html: page.html,
                }]
            })
            .unwrap_or_default();
        Collected {
            strategy,
            pages,
            log,
            errors,
        }
    }

    /// Open the page and run the interaction controller.
    ///
    /// `Err` means the page never became usable; crashes after that are
    /// reported through `InteractionOutcome::failure`.
    async fn render(
        &self,
        url: &str,
        errors: &mut Vec<ErrorRecord>,
    ) -> Result<InteractionOutcome, RenderError> {
        let page_timeout = self.config.page_timeout();
        let page = with_page_timeout(
            self.driver.open_page(url, page_timeout),
            page_timeout,
            "open page",
        )
        .await
        .map_err(RenderError::from_load)?;

        let outcome = self.drive_page(page.as_ref(), url, errors).await;

        if let Err(e) = page.close().await {
            debug!("Closing rendered page failed: {}", e);
        }
        outcome
    }

    async fn drive_page(
        &self,
        page: &dyn RenderedPage,
        url: &str,
        errors: &mut Vec<ErrorRecord>,
    ) -> Result<InteractionOutcome, RenderError> {
        let page_timeout = self.config.page_timeout();

        if let Err(e) = with_page_timeout(
            page.wait_for_load(LoadMode::Load, page_timeout),
            page_timeout,
            "page load",
        )
        .await
        {
            if e.is_fatal() {
                return Err(RenderError::from_load(e));
            }
            debug!("Load wait ended early, continuing with current DOM: {}", e);
        }

        let idle_timeout = self.config.network_idle_timeout();
        if let Err(e) = with_page_timeout(
            page.wait_for_network_idle(idle_timeout),
            idle_timeout,
            "network idle",
        )
        .await
        {
            if e.is_fatal() {
                return Err(RenderError::from_load(e));
            }
            debug!("Network never went idle: {}", e);
        }

        tokio::time::sleep(self.config.initial_render_wait()).await;

        if let Err(e) = noise_filter::strip_rendered(page).await {
            let err = RenderError::from_interaction(e);
            if err.is_fatal() {
                return Err(err);
            }
            warn!("Rendered noise filter failed: {}", err);
            errors.push(err.to_record(Phase::NoiseFilter));
        }

        let limits = InteractionLimits::from(&self.config);
        Ok(InteractionController::new(page, limits, url).run().await)
    }

    /// Static result, following next links with further static fetches when enabled.
    async fn collect_static(
        &self,
        url: &str,
        static_page: Option<StaticPage>,
        mut errors: Vec<ErrorRecord>,
    ) -> Collected {
        let mut log = InteractionLog::starting_at(url);
        let Some(first) = static_page else {
            return Collected {
                strategy: FetchStrategy::Error,
                pages: Vec::new(),
                log,
                errors,
            };
        };

        let mut pages = vec![PageSnapshot {
            url: first.final_url,
            html: first.html,
        }];

        if self.config.follow_static_pagination() {
            while log.pages.len() < self.config.max_pages() {
                let Some(current) = pages.last() else {
                    break;
                };
                let Some(next) = find_next_link(&current.html, &current.url, &log.pages) else {
                    break;
                };

                info!("Following static pagination to {}", next);
                match self.fetcher.fetch(&next).await {
                    Ok(page) => {
                        log.pages.push(next);
                        pages.push(PageSnapshot {
                            url: page.final_url,
                            html: page.html,
                        });
                    }
                    Err(err) => {
                        warn!("Static pagination fetch of {} failed: {}", next, err);
                        errors.push(err.to_record(Phase::Pagination));
                        break;
                    }
                }
            }
        }

        let strategy = if pages.len() > 1 {
            FetchStrategy::StaticPaginated
        } else {
            FetchStrategy::Static
        };

        Collected {
            strategy,
            pages,
            log,
            errors,
        }
    }

    /// Noise-filter and segment every page, then build the result.
    fn assemble(&self, url: &str, collected: Collected) -> ScrapeResult {
        let Collected {
            mut strategy,
            pages,
            log,
            mut errors,
        } = collected;

        let options = SegmentOptions::from(&self.config);
        let mut meta: Option<PageMeta> = None;
        let mut sections: Vec<Section> = Vec::new();
        let mut usable_pages = 0usize;

        for page in &pages {
            if page.html.trim().is_empty() {
                let err = ParseError::MalformedDocument(format!("empty document from {}", page.url));
                errors.push(err.to_record(Phase::Segmentation));
                continue;
            }
            usable_pages += 1;

            let mut document = Html::parse_document(&page.html);
            let removed = noise_filter::strip(&mut document);
            debug!("Removed {} noise nodes from {}", removed, page.url);

            if meta.is_none() {
                meta = Some(extract_meta(&document, &page.url, strategy));
            }

            let page_sections = segment(&document, &page.url, &options);
            if page_sections.is_empty() {
                let err = ParseError::MalformedDocument(format!(
                    "no content could be extracted from {}",
                    page.url
                ));
                errors.push(err.to_record(Phase::Segmentation));
            }
            debug!("{} sections from {}", page_sections.len(), page.url);
            sections.extend(page_sections);
        }

        if usable_pages == 0 {
            strategy = FetchStrategy::Error;
        }

        if sections.is_empty() {
            let mut result = error_result(url, log, errors);
            if let Some(mut meta) = meta {
                meta.strategy = strategy;
                result.meta = meta;
            }
            return result;
        }

        assign_section_ids(&mut sections);
        let mut meta = meta.unwrap_or_else(|| PageMeta::empty(strategy));
        meta.strategy = strategy;

        info!(
            "Scraped {} sections from {} page(s) using {}",
            sections.len(),
            usable_pages,
            strategy
        );

        ScrapeResult {
            url: url.to_string(),
            scraped_at: now_iso8601(),
            meta,
            sections,
            interactions: log,
            errors,
        }
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Result whose only section is the error placeholder
fn error_result(url: &str, log: InteractionLog, errors: Vec<ErrorRecord>) -> ScrapeResult {
    let reason = errors
        .last()
        .map(|e| e.message.clone())
        .unwrap_or_else(|| "no content could be extracted".to_string());

    ScrapeResult {
        url: url.to_string(),
        scraped_at: now_iso8601(),
        meta: PageMeta::empty(FetchStrategy::Error),
        sections: vec![Section::error_placeholder(url, &reason)],
        interactions: log,
        errors,
    }
}

/// Scrape `url` with a Chromium-backed engine built from `config`.
pub async fn scrape(url: &str, config: ScrapeConfig) -> anyhow::Result<ScrapeResult> {
    let engine = ScrapeEngine::with_chromium(config)?;
    Ok(engine.scrape(url).await)
}
