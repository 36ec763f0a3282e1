//! End-to-end engine tests: mockito for the static path, a scripted driver for rendering

mod common;

use adaptive_scrape::{FetchStrategy, ScrapeEngine, SectionType};
use common::{
    FakeDocument, FakeDriver, FakeSite, Faults, create_error_mock, create_html_mock,
    create_test_html, fast_config, long_article,
};
use mockito::Server;

fn landmark_page(title: &str) -> String {
    create_test_html(
        title,
        &format!(
            r#"<header><h1>Acme Roasters</h1><p>Small batch coffee since 2009.</p></header>
<section><h2>Our beans</h2>{}</section>
<section><h2>Our process</h2>{}</section>
<footer><p>Copyright Acme Roasters. All rights reserved.</p></footer>"#,
            long_article(4),
            long_article(4)
        ),
    )
}

fn types(result: &adaptive_scrape::ScrapeResult) -> Vec<SectionType> {
    result.sections.iter().map(|s| s.section_type).collect()
}

#[tokio::test]
async fn server_rendered_page_uses_static_strategy() {
    let mut server = Server::new_async().await;
    let _mock = create_html_mock(&mut server, "/about", &landmark_page("About us")).await;
    let url = format!("{}/about", server.url());

    let driver = FakeDriver::default();
    let calls = driver.calls.clone();
    let engine = ScrapeEngine::new(fast_config().build().unwrap(), driver).unwrap();
    let result = engine.scrape(&url).await;

    assert_eq!(result.meta.strategy, FetchStrategy::Static);
    assert_eq!(result.meta.title, "About us");
    assert_eq!(result.meta.language, "en");
    assert_eq!(
        types(&result),
        vec![
            SectionType::Hero,
            SectionType::Section,
            SectionType::Section,
            SectionType::Footer
        ]
    );
    let ids: Vec<&str> = result.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["hero-0", "section-0", "section-1", "footer-0"]);
    assert!(result.sections.iter().all(|s| s.source_url == url));
    assert!(result.errors.is_empty());
    assert_eq!(result.interactions.pages, vec![url]);
    assert!(calls.lock().unwrap().opened.is_empty());
}

#[tokio::test]
async fn forbidden_static_fetch_escalates_to_rendering() {
    let mut server = Server::new_async().await;
    let _mock = create_error_mock(&mut server, "/members", 403).await;
    let url = format!("{}/members", server.url());

    let site = FakeSite::default().page(&url, FakeDocument::new(landmark_page("Members")));
    let driver = FakeDriver::new(site);
    let calls = driver.calls.clone();
    let engine = ScrapeEngine::new(fast_config().build().unwrap(), driver).unwrap();
    let result = engine.scrape(&url).await;

    assert_eq!(result.meta.strategy, FetchStrategy::JsForced);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].phase, "static-fetch");
    assert_eq!(result.errors[0].error_type, "FetchError.forbidden");
    assert_eq!(result.sections.len(), 4);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.opened, vec![url]);
    assert!(calls.closed);
}

#[tokio::test]
async fn thin_static_page_is_rendered_and_scrolled_until_stable() {
    let mut server = Server::new_async().await;
    let shell = create_test_html("Feed", r#"<div id="root">Loading</div>"#);
    let _mock = create_html_mock(&mut server, "/feed", &shell).await;
    let url = format!("{}/feed", server.url());

    let site = FakeSite::default().page(&url, FakeDocument::new(landmark_page("Feed")));
    let engine = ScrapeEngine::new(
        fast_config().max_scrolls(5).build().unwrap(),
        FakeDriver::new(site),
    )
    .unwrap();
    let result = engine.scrape(&url).await;

    assert_eq!(result.meta.strategy, FetchStrategy::Js);
    assert_eq!(result.interactions.scrolls, 2);
    assert!(result.interactions.clicks.is_empty());
    assert_eq!(result.sections.len(), 4);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn growing_feed_scrolls_until_content_stops_changing() {
    let mut server = Server::new_async().await;
    let shell = create_test_html("Feed", "<main><p>Loading</p></main>");
    let _mock = create_html_mock(&mut server, "/feed", &shell).await;
    let url = format!("{}/feed", server.url());

    let site = FakeSite::default().page(
        &url,
        FakeDocument::new(landmark_page("Feed")).growing_for(2),
    );
    let engine = ScrapeEngine::new(
        fast_config().max_scrolls(10).build().unwrap(),
        FakeDriver::new(site),
    )
    .unwrap();
    let result = engine.scrape(&url).await;

    // two growing scrolls, then two unchanged ones
    assert_eq!(result.interactions.scrolls, 4);
}

#[tokio::test]
async fn driver_crash_falls_back_to_static_html() {
    let mut server = Server::new_async().await;
    let thin = create_test_html("Teaser", "<main><p>Short teaser text for the product.</p></main>");
    let _mock = create_html_mock(&mut server, "/teaser", &thin).await;
    let url = format!("{}/teaser", server.url());

    let site = FakeSite::default().faults(Faults {
        crash_on_open: true,
        ..Faults::default()
    });
    let engine = ScrapeEngine::new(fast_config().build().unwrap(), FakeDriver::new(site)).unwrap();
    let result = engine.scrape(&url).await;

    assert_eq!(result.meta.strategy, FetchStrategy::StaticFallback);
    assert_eq!(result.meta.title, "Teaser");
    assert_eq!(result.sections.len(), 1);
    assert!(result.sections[0].content.text.contains("Short teaser text"));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].phase, "render");
    assert_eq!(result.errors[0].error_type, "RenderError.driverCrash");
}

#[tokio::test]
async fn crash_during_interaction_falls_back_and_closes_page() {
    let mut server = Server::new_async().await;
    let thin = create_test_html("Teaser", "<main><p>Short teaser text for the product.</p></main>");
    let _mock = create_html_mock(&mut server, "/teaser", &thin).await;
    let url = format!("{}/teaser", server.url());

    let site = FakeSite::default()
        .page(&url, FakeDocument::new(landmark_page("Rendered")))
        .faults(Faults {
            crash_on_scroll: true,
            ..Faults::default()
        });
    let driver = FakeDriver::new(site);
    let calls = driver.calls.clone();
    let engine = ScrapeEngine::new(fast_config().build().unwrap(), driver).unwrap();
    let result = engine.scrape(&url).await;

    assert_eq!(result.meta.strategy, FetchStrategy::StaticFallback);
    assert!(result.sections[0].content.text.contains("Short teaser text"));
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.phase == "render" && e.error_type == "RenderError.driverCrash")
    );
    assert_eq!(result.interactions.pages, vec![url]);
    assert!(calls.lock().unwrap().closed);
}

#[tokio::test]
async fn nothing_usable_yields_error_placeholder() {
    let mut server = Server::new_async().await;
    let _mock = create_error_mock(&mut server, "/gone", 403).await;
    let url = format!("{}/gone", server.url());

    let site = FakeSite::default().faults(Faults {
        crash_on_open: true,
        ..Faults::default()
    });
    let engine = ScrapeEngine::new(fast_config().build().unwrap(), FakeDriver::new(site)).unwrap();
    let result = engine.scrape(&url).await;

    assert_eq!(result.meta.strategy, FetchStrategy::Error);
    assert_eq!(result.sections.len(), 1);
    let placeholder = &result.sections[0];
    assert_eq!(placeholder.id, "error-0");
    assert_eq!(placeholder.section_type, SectionType::Unknown);
    assert_eq!(placeholder.label, "Error");
    assert!(placeholder.content.text.starts_with("Failed to scrape: "));

    let phases: Vec<&str> = result.errors.iter().map(|e| e.phase.as_str()).collect();
    assert_eq!(phases, vec!["static-fetch", "render"]);
}

#[tokio::test]
async fn static_pagination_concatenates_pages_in_visit_order() {
    let mut server = Server::new_async().await;
    let first = landmark_page("Archive").replace(
        "</footer>",
        r#"<a rel="next" href="/archive/2">Older posts</a></footer>"#,
    );
    let second = landmark_page("Archive page 2");
    let _first = create_html_mock(&mut server, "/archive", &first).await;
    let _second = create_html_mock(&mut server, "/archive/2", &second).await;
    let url = format!("{}/archive", server.url());
    let page_two = format!("{}/archive/2", server.url());

    let engine =
        ScrapeEngine::new(fast_config().build().unwrap(), FakeDriver::default()).unwrap();
    let result = engine.scrape(&url).await;

    assert_eq!(result.meta.strategy, FetchStrategy::StaticPaginated);
    assert_eq!(result.meta.title, "Archive");
    assert_eq!(result.interactions.pages, vec![url.clone(), page_two.clone()]);

    assert_eq!(result.sections.len(), 8);
    let last = result.sections.last().unwrap();
    assert_eq!(last.source_url, page_two);
    assert_eq!(last.id, "footer-1");
    assert_eq!(result.sections[5].id, "section-2");
    assert_eq!(result.sections[0].source_url, url);
}

#[tokio::test]
async fn static_pagination_can_be_disabled() {
    let mut server = Server::new_async().await;
    let first = landmark_page("Archive").replace(
        "</footer>",
        r#"<a rel="next" href="/archive/2">Older posts</a></footer>"#,
    );
    let _first = create_html_mock(&mut server, "/archive", &first).await;
    let url = format!("{}/archive", server.url());

    let config = fast_config().follow_static_pagination(false).build().unwrap();
    let engine = ScrapeEngine::new(config, FakeDriver::default()).unwrap();
    let result = engine.scrape(&url).await;

    assert_eq!(result.meta.strategy, FetchStrategy::Static);
    assert_eq!(result.interactions.pages.len(), 1);
}

#[tokio::test]
async fn overall_timeout_still_returns_a_result() {
    let mut server = Server::new_async().await;
    let _mock = create_error_mock(&mut server, "/slow", 500).await;
    let url = format!("{}/slow", server.url());

    let site = FakeSite::default().faults(Faults {
        hang_on_open: true,
        ..Faults::default()
    });
    let config = fast_config()
        .timeout_secs(30)
        .overall_timeout_secs(Some(1))
        .build()
        .unwrap();
    let engine = ScrapeEngine::new(config, FakeDriver::new(site)).unwrap();
    let result = engine.scrape(&url).await;

    assert_eq!(result.meta.strategy, FetchStrategy::Error);
    assert_eq!(result.sections.len(), 1);
    assert_eq!(result.sections[0].id, "error-0");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].phase, "scrape");
    assert_eq!(result.errors[0].error_type, "FetchError.timeout");
}

#[tokio::test]
async fn result_serializes_with_camel_case_schema() {
    let mut server = Server::new_async().await;
    let _mock = create_html_mock(&mut server, "/about", &landmark_page("About us")).await;
    let url = format!("{}/about", server.url());

    let engine =
        ScrapeEngine::new(fast_config().build().unwrap(), FakeDriver::default()).unwrap();
    let result = engine.scrape(&url).await;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["meta"]["strategy"], "static");
    assert!(json["scrapedAt"].as_str().unwrap().ends_with('Z'));
    assert_eq!(json["sections"][0]["type"], "hero");
    assert!(json["sections"][0]["rawHtmlSnippet"].is_string());
    assert!(json["sections"][0]["sourceUrl"].is_string());
    assert!(json["interactions"]["scrolls"].is_number());
}
