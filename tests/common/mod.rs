//! Test utilities shared by the integration tests
//!
//! Provides mockito helpers for the static path and a scripted in-memory
//! browser driver for the rendered path.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use adaptive_scrape::renderer::js_scripts::{CONTENT_FINGERPRINT_SCRIPT, SCROLL_TO_BOTTOM_SCRIPT};
use adaptive_scrape::{
    BrowserDriver, ClickStrategy, DriverError, ElementHandle, LoadMode, RenderedPage, ScrapeConfig,
};
use async_trait::async_trait;
use mockito::{Mock, Server};

/// Creates a test HTML document with specified content
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{}</title>
</head>
<body>
    {}
</body>
</html>"#,
        html_escape::encode_text(title),
        body
    )
}

/// A long, plainly server-rendered article body
pub fn long_article(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            format!(
                "<p>Paragraph {i} explains how the roastery sources, roasts and ships \
                 single-origin beans to subscribers every week of the year.</p>"
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mock endpoint returning HTML
pub async fn create_html_mock(server: &mut Server, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

/// Mock endpoint returning an error status
pub async fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("error")
        .create_async()
        .await
}

/// Config with every wait shortened for tests
pub fn fast_config() -> adaptive_scrape::ScrapeConfigBuilder {
    ScrapeConfig::builder()
        .timeout_secs(5)
        .settle_delay_ms(0)
        .network_idle_timeout_ms(50)
        .network_quiet_window_ms(0)
        .initial_render_wait_ms(0)
}

pub fn element(tag: &str, text: &str, path: &str) -> ElementHandle {
    ElementHandle {
        tag: tag.to_string(),
        text: text.to_string(),
        path: path.to_string(),
        visible: true,
        enabled: true,
        ..ElementHandle::default()
    }
}

pub fn link(text: &str, href: &str, path: &str) -> ElementHandle {
    ElementHandle {
        href: Some(href.to_string()),
        ..element("a", text, path)
    }
}

/// One scripted document: its HTML plus what `query_all` returns per selector
#[derive(Debug, Clone, Default)]
pub struct FakeDocument {
    pub html: String,
    pub elements: HashMap<String, Vec<ElementHandle>>,
    /// Scrolls that still grow the page; later scrolls change nothing
    pub growing_scrolls: u64,
}

impl FakeDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    pub fn with_elements(mut self, selector: &str, elements: Vec<ElementHandle>) -> Self {
        self.elements.insert(selector.to_string(), elements);
        self
    }

    pub fn growing_for(mut self, scrolls: u64) -> Self {
        self.growing_scrolls = scrolls;
        self
    }
}

/// Where the scripted driver breaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    pub crash_on_open: bool,
    /// `open_page` never completes
    pub hang_on_open: bool,
    pub crash_on_click: bool,
    pub crash_on_scroll: bool,
    /// Strategies that report a script error instead of clicking
    pub failing_strategies: &'static [ClickStrategy],
}

/// What the driver observed
#[derive(Debug, Default)]
pub struct CallLog {
    pub opened: Vec<String>,
    pub clicks: Vec<(String, ClickStrategy)>,
    pub gotos: Vec<String>,
    pub scrolls: u64,
    pub closed: bool,
}

/// In-memory site served by the scripted driver
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    pub documents: HashMap<String, FakeDocument>,
    pub faults: Faults,
}

impl FakeSite {
    pub fn page(mut self, url: &str, document: FakeDocument) -> Self {
        self.documents.insert(url.to_string(), document);
        self
    }

    pub fn faults(mut self, faults: Faults) -> Self {
        self.faults = faults;
        self
    }
}

#[derive(Clone, Default)]
pub struct FakeDriver {
    site: Arc<FakeSite>,
    pub calls: Arc<Mutex<CallLog>>,
}

impl FakeDriver {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            calls: Arc::new(Mutex::new(CallLog::default())),
        }
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn open_page(
        &self,
        url: &str,
        _timeout: Duration,
    ) -> Result<Box<dyn RenderedPage>, DriverError> {
        self.calls.lock().unwrap().opened.push(url.to_string());
        if self.site.faults.crash_on_open {
            return Err(DriverError::Crashed("browser process exited".into()));
        }
        if self.site.faults.hang_on_open {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(Box::new(FakePage {
            site: Arc::clone(&self.site),
            calls: Arc::clone(&self.calls),
            current: Mutex::new(url.to_string()),
            scrolls_here: Mutex::new(0),
        }))
    }
}

pub struct FakePage {
    site: Arc<FakeSite>,
    calls: Arc<Mutex<CallLog>>,
    current: Mutex<String>,
    scrolls_here: Mutex<u64>,
}

impl FakePage {
    fn document(&self) -> FakeDocument {
        let url = self.current.lock().unwrap().clone();
        self.site
            .documents
            .get(&url)
            .cloned()
            .unwrap_or_else(|| FakeDocument::new("<html><body></body></html>"))
    }
}

#[async_trait]
impl RenderedPage for FakePage {
    async fn wait_for_load(&self, _mode: LoadMode, _timeout: Duration) -> Result<(), DriverError> {
        Ok(())
    }

    async fn wait_for_network_idle(&self, _timeout: Duration) -> Result<(), DriverError> {
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, DriverError> {
        let mut handles = self
            .document()
            .elements
            .get(selector)
            .cloned()
            .unwrap_or_default();
        for (id, handle) in handles.iter_mut().enumerate() {
            handle.id = id;
        }
        Ok(handles)
    }

    async fn click(
        &self,
        element: &ElementHandle,
        strategy: ClickStrategy,
    ) -> Result<(), DriverError> {
        let faults = self.site.faults;
        if faults.crash_on_click {
            return Err(DriverError::Crashed("target closed".into()));
        }
        if faults.failing_strategies.contains(&strategy) {
            return Err(DriverError::Script("element is not clickable".into()));
        }
        self.calls
            .lock()
            .unwrap()
            .clicks
            .push((element.path.clone(), strategy));
        Ok(())
    }

    async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value, DriverError> {
        if script == SCROLL_TO_BOTTOM_SCRIPT {
            if self.site.faults.crash_on_scroll {
                return Err(DriverError::Crashed("websocket closed".into()));
            }
            *self.scrolls_here.lock().unwrap() += 1;
            self.calls.lock().unwrap().scrolls += 1;
            return Ok(serde_json::Value::Null);
        }
        if script == CONTENT_FINGERPRINT_SCRIPT {
            let scrolls = *self.scrolls_here.lock().unwrap();
            let grown = scrolls.min(self.document().growing_scrolls);
            return Ok(serde_json::json!({
                "height": 1000 + grown * 500,
                "items": 10 + grown * 5,
            }));
        }
        Ok(serde_json::json!(0))
    }

    async fn rendered_html(&self) -> Result<String, DriverError> {
        Ok(self.document().html)
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn goto(&self, url: &str, _timeout: Duration) -> Result<(), DriverError> {
        self.calls.lock().unwrap().gotos.push(url.to_string());
        if !self.site.documents.contains_key(url) {
            return Err(DriverError::Timeout(format!("navigation to {url} timed out")));
        }
        *self.current.lock().unwrap() = url.to_string();
        *self.scrolls_here.lock().unwrap() = 0;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), DriverError> {
        self.calls.lock().unwrap().closed = true;
        Ok(())
    }
}
