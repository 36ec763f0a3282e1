//! Interaction controller
//!
//! Drives one rendered page through a bounded sequence of phases to surface
//! latent content:
//!
//! `Loaded → TabPhase → LoadMorePhase → PaginationOrScrollPhase → Done`,
//! with `Failed` reachable from any phase when the browser session dies.
//!
//! Element-level failures and timeouts are recorded and end the current
//! sub-phase; only a driver crash stops the controller.

pub mod activation;
pub mod click;
pub mod pagination;
pub mod rules;
pub mod scroll;

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ScrapeConfig;
use crate::page_extractor::{ClickRecord, ErrorRecord, InteractionLog};
use crate::renderer::{DriverError, RenderedPage};
use crate::scrape_engine::errors::{Phase, Recordable, RenderError};
use crate::utils::constants::CLICK_ATTEMPT_TIMEOUT_MS;

pub use click::{CLICK_ESCALATION, ClickOutcome, click_with_escalation};
pub use pagination::find_next_link;
pub use scroll::{ContentFingerprint, NO_CHANGE_LIMIT};

/// Caps and waits applied by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionLimits {
    pub max_tab_clicks: usize,
    /// Per distinct button signature
    pub max_load_more_clicks: usize,
    /// Total pages including the first
    pub max_pages: usize,
    pub max_scrolls: usize,
    pub settle_delay: Duration,
    pub network_idle_timeout: Duration,
    pub page_timeout: Duration,
    pub click_timeout: Duration,
}

impl From<&ScrapeConfig> for InteractionLimits {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            max_tab_clicks: config.max_tab_clicks(),
            max_load_more_clicks: config.max_load_more_clicks(),
            max_pages: config.max_pages(),
            max_scrolls: config.max_scrolls(),
            settle_delay: config.settle_delay(),
            network_idle_timeout: config.network_idle_timeout(),
            page_timeout: config.page_timeout(),
            click_timeout: Duration::from_millis(CLICK_ATTEMPT_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Loaded,
    TabPhase,
    LoadMorePhase,
    PaginationOrScrollPhase,
    Done,
    Failed,
}

/// Rendered HTML captured from one visited page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct InteractionOutcome {
    pub log: InteractionLog,
    /// Captured pages in visit order
    pub pages: Vec<PageSnapshot>,
    /// Non-fatal errors, in the order they happened
    pub errors: Vec<ErrorRecord>,
    pub state: ControllerState,
    /// Set when the session crashed; pages captured before the crash are kept
    pub failure: Option<RenderError>,
}

pub struct InteractionController<'p> {
    page: &'p dyn RenderedPage,
    limits: InteractionLimits,
    state: ControllerState,
    log: InteractionLog,
    pages: Vec<PageSnapshot>,
    errors: Vec<ErrorRecord>,
}

impl<'p> InteractionController<'p> {
    #[must_use]
    pub fn new(page: &'p dyn RenderedPage, limits: InteractionLimits, start_url: &str) -> Self {
        Self {
            page,
            limits,
            state: ControllerState::Loaded,
            log: InteractionLog::starting_at(start_url),
            pages: Vec::new(),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Run every phase and hand back what was collected.
    pub async fn run(mut self) -> InteractionOutcome {
        let failure = match self.drive().await {
            Ok(()) => {
                self.transition(ControllerState::Done);
                None
            }
            Err(err) => {
                warn!("Interaction aborted in {:?}: {}", self.state, err);
                self.transition(ControllerState::Failed);
                Some(err)
            }
        };

        InteractionOutcome {
            log: self.log,
            pages: self.pages,
            errors: self.errors,
            state: self.state,
            failure,
        }
    }

    async fn drive(&mut self) -> Result<(), RenderError> {
        self.transition(ControllerState::TabPhase);
        self.tab_phase().await?;

        self.transition(ControllerState::LoadMorePhase);
        self.load_more_phase().await?;

        self.transition(ControllerState::PaginationOrScrollPhase);
        let next = match self.find_next_page().await {
            Ok(next) => next,
            Err(e) => {
                self.absorb(Phase::Pagination, e)?;
                None
            }
        };

        match next {
            Some(url) => self.follow_pagination(url).await,
            None => {
                self.scroll_phase().await?;
                self.snapshot().await
            }
        }
    }

    fn transition(&mut self, next: ControllerState) {
        debug!("Interaction state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Propagate fatal driver errors; record anything else and let the caller end its sub-phase.
    fn absorb(&mut self, phase: Phase, err: DriverError) -> Result<(), RenderError> {
        let err = RenderError::from_interaction(err);
        if err.is_fatal() {
            return Err(err);
        }
        self.record(phase, &err);
        Ok(())
    }

    fn record(&mut self, phase: Phase, err: &RenderError) {
        warn!("{} error (continuing): {}", phase, err);
        self.errors.push(err.to_record(phase));
    }

    fn log_click(&mut self, selector: &str, index: usize, text: String) {
        info!("Clicked '{}' via {}[{}]", text, selector, index);
        self.log.clicks.push(ClickRecord {
            selector: selector.to_string(),
            index,
            text,
        });
    }

    /// Settle delay followed by a bounded network-quiet wait.
    ///
    /// A wait that runs out proceeds with what is rendered.
    async fn settle(&self) -> Result<(), RenderError> {
        tokio::time::sleep(self.limits.settle_delay).await;
        match self
            .page
            .wait_for_network_idle(self.limits.network_idle_timeout)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(RenderError::from_interaction(e)),
            Err(e) => {
                debug!("Settle wait ended early: {}", e);
                Ok(())
            }
        }
    }

    /// Capture the current page's rendered HTML.
    async fn snapshot(&mut self) -> Result<(), RenderError> {
        let url = match self.page.current_url().await {
            Ok(url) if url != "about:blank" => url,
            Ok(_) => self.log.pages.last().cloned().unwrap_or_default(),
            Err(e) => {
                self.absorb(Phase::Interaction, e)?;
                self.log.pages.last().cloned().unwrap_or_default()
            }
        };

        match self.page.rendered_html().await {
            Ok(html) => {
                debug!("Captured {} bytes from {}", html.len(), url);
                self.pages.push(PageSnapshot { url, html });
                Ok(())
            }
            Err(e) => self.absorb(Phase::Interaction, e),
        }
    }
}
