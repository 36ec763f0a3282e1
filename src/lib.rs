pub mod analysis;
pub mod browser_setup;
pub mod config;
pub mod fetch;
pub mod interaction;
pub mod noise_filter;
pub mod page_extractor;
pub mod renderer;
pub mod scrape_engine;
pub mod strategy;
pub mod utils;

pub use analysis::{DensityReport, analyze};
pub use browser_setup::{
    LaunchOptions, download_managed_browser, find_browser_executable, launch_browser,
};
pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use fetch::{FetchError, StaticFetcher, StaticPage, fetch_static};
pub use interaction::{
    ControllerState, InteractionController, InteractionLimits, InteractionOutcome, PageSnapshot,
};
pub use page_extractor::schema::*;
pub use renderer::{
    BrowserDriver, ChromiumDriver, ClickStrategy, DriverError, ElementHandle, LoadMode,
    RenderedPage,
};
pub use scrape_engine::{ParseError, Phase, RenderError, ScrapeEngine, ScrapeError, scrape};
pub use strategy::{FetchStrategy, choose_strategy};
