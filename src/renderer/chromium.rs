//! Chromium-backed driver over chromiumoxide

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

use super::browser::BrowserWrapper;
use super::js_scripts::{
    DESCRIBE_ELEMENT_FN, FORCED_CLICK_FN, NETWORK_ACTIVITY_SCRIPT, READY_STATE_SCRIPT,
    SCRIPT_CLICK_FN,
};
use super::page_helpers::{call_on_element, driver_error, evaluate_json, page_url_with_fallback};
use super::{BrowserDriver, ClickStrategy, DriverError, ElementHandle, LoadMode, RenderedPage};
use crate::browser_setup::{LaunchOptions, prepare_page};
use crate::config::ScrapeConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Launches one browser per opened page
#[derive(Debug, Clone)]
pub struct ChromiumDriver {
    launch: LaunchOptions,
    quiet_window: Duration,
}

impl ChromiumDriver {
    #[must_use]
    pub fn new(launch: LaunchOptions, quiet_window: Duration) -> Self {
        Self {
            launch,
            quiet_window,
        }
    }

    #[must_use]
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self::new(
            LaunchOptions {
                headless: config.headless(),
                user_agent: config.user_agent().to_string(),
                user_data_dir: config.chrome_data_dir().cloned(),
                request_timeout: config.page_timeout(),
            },
            config.network_quiet_window(),
        )
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn open_page(
        &self,
        url: &str,
        nav_timeout: Duration,
    ) -> Result<Box<dyn RenderedPage>, DriverError> {
        let wrapper = BrowserWrapper::launch(&self.launch)
            .await
            .map_err(|e| DriverError::Crashed(format!("Failed to launch browser: {e:#}")))?;

        let page = match wrapper.browser().new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                wrapper.shutdown().await;
                return Err(DriverError::Crashed(format!("Failed to open page: {e}")));
            }
        };

        if let Err(e) = prepare_page(&page).await {
            warn!("Page preparation failed, continuing: {e:#}");
        }

        let rendered = ChromiumPage {
            page,
            elements: HandleStore::new(),
            browser: Mutex::new(Some(wrapper)),
            quiet_window: self.quiet_window,
        };

        if let Err(e) = rendered.goto(url, nav_timeout).await {
            let _ = Box::new(rendered).close().await;
            return Err(e);
        }

        info!("Opened rendered page: {}", url);
        Ok(Box::new(rendered))
    }
}

/// Live nodes handed out by `query_all`, indexed by `ElementHandle::id`
///
/// Ids stay valid until the next navigation clears the store.
struct HandleStore<T> {
    items: Mutex<Vec<Arc<T>>>,
}

impl<T> HandleStore<T> {
    fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, item: T) -> Result<usize, DriverError> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| DriverError::Script("element store poisoned".into()))?;
        items.push(Arc::new(item));
        Ok(items.len() - 1)
    }

    /// The guard is released before returning; callers may await on the node.
    fn get(&self, id: usize) -> Result<Arc<T>, DriverError> {
        let items = self
            .items
            .lock()
            .map_err(|_| DriverError::Script("element store poisoned".into()))?;
        items
            .get(id)
            .cloned()
            .ok_or_else(|| DriverError::NotFound(format!("element handle {id}")))
    }

    fn clear(&self) {
        if let Ok(mut items) = self.items.lock() {
            items.clear();
        }
    }
}

/// One page in its own browser session
pub struct ChromiumPage {
    page: Page,
    elements: HandleStore<Element>,
    browser: Mutex<Option<BrowserWrapper>>,
    quiet_window: Duration,
}

impl ChromiumPage {
    async fn describe(element: &Element) -> Result<ElementHandle, DriverError> {
        let value = call_on_element(element, DESCRIBE_ELEMENT_FN).await?;
        let serde_json::Value::String(json) = value else {
            return Err(DriverError::Script("element description was not a string".into()));
        };
        serde_json::from_str(&json)
            .map_err(|e| DriverError::Script(format!("bad element description: {e}")))
    }

    async fn ready_state(&self) -> Result<String, DriverError> {
        let value = evaluate_json(&self.page, READY_STATE_SCRIPT).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

#[async_trait]
impl RenderedPage for ChromiumPage {
    async fn wait_for_load(&self, mode: LoadMode, limit: Duration) -> Result<(), DriverError> {
        let poll = async {
            loop {
                let state = self.ready_state().await?;
                let reached = match mode {
                    LoadMode::DomContentLoaded => state == "interactive" || state == "complete",
                    LoadMode::Load => state == "complete",
                };
                if reached {
                    return Ok::<(), DriverError>(());
                }
                sleep(POLL_INTERVAL).await;
            }
        };
        timeout(limit, poll).await.map_err(|_| {
            DriverError::Timeout(format!("{mode:?} not reached within {}ms", limit.as_millis()))
        })?
    }

    async fn wait_for_network_idle(&self, limit: Duration) -> Result<(), DriverError> {
        let quiet_window = self.quiet_window;
        let poll = async {
            let mut last_count: Option<u64> = None;
            let mut quiet_since = Instant::now();
            loop {
                let activity = evaluate_json(&self.page, NETWORK_ACTIVITY_SCRIPT).await?;
                let count = activity["resources"].as_u64().unwrap_or_default();
                let complete = activity["readyState"].as_str() == Some("complete");

                if last_count != Some(count) || !complete {
                    last_count = Some(count);
                    quiet_since = Instant::now();
                } else if quiet_since.elapsed() >= quiet_window {
                    return Ok::<(), DriverError>(());
                }
                sleep(POLL_INTERVAL).await;
            }
        };
        timeout(limit, poll).await.map_err(|_| {
            DriverError::Timeout(format!("network not idle within {}ms", limit.as_millis()))
        })?
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, DriverError> {
        let found = match self.page.find_elements(selector).await {
            Ok(found) => found,
            Err(e) => {
                let err = driver_error(e);
                if err.is_fatal() {
                    return Err(err);
                }
                // No match and unsupported selector syntax both surface as errors here
                debug!("Query '{}' returned nothing: {}", selector, err);
                return Ok(Vec::new());
            }
        };

        let mut handles = Vec::with_capacity(found.len());
        for element in found {
            let mut handle = match Self::describe(&element).await {
                Ok(handle) => handle,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!("Skipping element matched by '{}': {}", selector, e);
                    continue;
                }
            };
            handle.id = self.elements.push(element)?;
            handles.push(handle);
        }
        Ok(handles)
    }

    async fn click(
        &self,
        handle: &ElementHandle,
        strategy: ClickStrategy,
    ) -> Result<(), DriverError> {
        let element = self.elements.get(handle.id)?;
        match strategy {
            ClickStrategy::Direct => {
                element.click().await.map_err(driver_error)?;
            }
            ClickStrategy::Forced => {
                call_on_element(&element, FORCED_CLICK_FN).await?;
            }
            ClickStrategy::Script => {
                call_on_element(&element, SCRIPT_CLICK_FN).await?;
            }
        }
        Ok(())
    }

    async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value, DriverError> {
        evaluate_json(&self.page, script).await
    }

    async fn rendered_html(&self) -> Result<String, DriverError> {
        self.page.content().await.map_err(driver_error)
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(page_url_with_fallback(&self.page).await)
    }

    async fn goto(&self, url: &str, limit: Duration) -> Result<(), DriverError> {
        self.elements.clear();
        match timeout(limit, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(driver_error(e)),
            Err(_) => Err(DriverError::Timeout(format!(
                "navigation to {url} exceeded {}ms",
                limit.as_millis()
            ))),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        let Self { page, browser, .. } = *self;
        let result = page.close().await.map_err(driver_error);
        if let Ok(Some(wrapper)) = browser.into_inner() {
            wrapper.shutdown().await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rendered_page<T: RenderedPage>() {}

    #[test]
    fn chromium_page_satisfies_driver_contract() {
        assert_rendered_page::<ChromiumPage>();
    }

    #[test]
    fn handle_ids_follow_insertion_order() {
        let store = HandleStore::new();
        assert_eq!(store.push("tab".to_string()).unwrap(), 0);
        assert_eq!(store.push("button".to_string()).unwrap(), 1);
        assert_eq!(store.get(1).unwrap().as_str(), "button");
    }

    #[test]
    fn lookups_share_the_stored_node() {
        let store = HandleStore::new();
        let id = store.push(String::from("load more")).unwrap();
        let first = store.get(id).unwrap();
        let second = store.get(id).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        // a held handle does not block further pushes
        assert_eq!(store.push(String::from("next")).unwrap(), 1);
    }

    #[test]
    fn navigation_invalidates_handles() {
        let store = HandleStore::new();
        let id = store.push(String::from("tab")).unwrap();
        store.clear();
        assert!(matches!(store.get(id), Err(DriverError::NotFound(_))));
    }
}
