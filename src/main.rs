//! Command-line entry point: scrape one URL and print the result as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adaptive_scrape::utils::{
    DEFAULT_MAX_LOAD_MORE_CLICKS, DEFAULT_MAX_PAGES, DEFAULT_MAX_RAW_HTML_LENGTH,
    DEFAULT_MAX_SCROLLS, DEFAULT_MAX_TAB_CLICKS, DEFAULT_TIMEOUT_SECS,
};
use adaptive_scrape::{ScrapeConfig, ScrapeEngine};

#[derive(Parser)]
#[command(
    name = "adaptive-scrape",
    about = "Extract labelled content sections from a web page",
    version
)]
struct Cli {
    /// Page to scrape; a missing scheme defaults to https
    url: String,

    /// Per page-load timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Abort the whole scrape after this many seconds
    #[arg(long)]
    overall_timeout: Option<u64>,

    /// Maximum number of pages to visit, including the first
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Maximum number of scroll iterations
    #[arg(long, default_value_t = DEFAULT_MAX_SCROLLS)]
    max_scrolls: usize,

    /// Maximum number of tab activations
    #[arg(long, default_value_t = DEFAULT_MAX_TAB_CLICKS)]
    max_tab_clicks: usize,

    /// Maximum number of load-more rounds
    #[arg(long, default_value_t = DEFAULT_MAX_LOAD_MORE_CLICKS)]
    max_load_more_clicks: usize,

    /// Maximum characters of raw HTML kept per section
    #[arg(long, default_value_t = DEFAULT_MAX_RAW_HTML_LENGTH)]
    max_raw_html_length: usize,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Do not follow next-page links on statically fetched pages
    #[arg(long)]
    no_static_pagination: bool,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let filter = ["chromiumoxide::handler=off", "chromiumoxide::conn=off"]
        .into_iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(filter, |filter, directive| filter.add_directive(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = ScrapeConfig::builder()
        .timeout_secs(cli.timeout)
        .overall_timeout_secs(cli.overall_timeout)
        .max_pages(cli.max_pages)
        .max_scrolls(cli.max_scrolls)
        .max_tab_clicks(cli.max_tab_clicks)
        .max_load_more_clicks(cli.max_load_more_clicks)
        .max_raw_html_length(cli.max_raw_html_length)
        .headless(!cli.headful)
        .follow_static_pagination(!cli.no_static_pagination)
        .build()
        .context("Invalid scrape configuration")?;

    let engine = ScrapeEngine::with_chromium(config)?;
    let result = engine.scrape(&cli.url).await;

    let json = if cli.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{json}");
    Ok(())
}
