//! End-to-end crawl tests against a mock website

use gleaner::config::Config;
use gleaner::crawler::{crawl, CrawlEvent, Crawler, NoopObserver};
use gleaner::state::PageState;
use tempfile::TempDir;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `output_dir`, with no delay between fetches
fn create_test_config(output_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.crawler.fetch_delay_seconds = 0.0;
    config.crawler.request_timeout_seconds = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.output.output_dir = output_dir.path().to_path_buf();
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

/// Number of requests the mock server received for `page_path`
async fn hits(server: &MockServer, page_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == page_path)
        .count()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<h1>Home</h1><a href="{}/page1">Page 1</a> <a href="/page2">Page 2</a>"#,
            base_url
        ),
    )
    .await;
    mount_page(&mock_server, "/page1", "<p>First page text</p>").await;
    mount_page(&mock_server, "/page2", "<p>Second page text</p>").await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&output_dir);
    let crawler = Crawler::from_config(&config).unwrap();

    let report = crawler
        .run(&format!("{}/", base_url), 1, &NoopObserver)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages.len(), 3);
    assert!(report.failures.is_empty());
    assert_eq!(report.progress.saved, 3);

    // Every page was written, holding only its text
    let saved = report.saved_paths();
    assert_eq!(saved.len(), 3);
    let page1 = report
        .pages
        .iter()
        .find(|p| p.source_url.ends_with("/page1"))
        .unwrap();
    let text = std::fs::read_to_string(page1.saved_path.as_ref().unwrap()).unwrap();
    assert_eq!(text, "First page text");
    assert_eq!(page1.depth, 1);
    assert_eq!(page1.title.as_deref(), Some("Test"));

    for page_path in ["/", "/page1", "/page2"] {
        assert_eq!(hits(&mock_server, page_path).await, 1, "{}", page_path);
    }
}

#[tokio::test]
async fn test_seed_without_links_yields_one_record() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<p>Lonely page</p>").await;

    let output_dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&output_dir);

    let report = crawl(&config, &format!("{}/", mock_server.uri()), Some(3))
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.pages[0].text, "Lonely page");
}

#[tokio::test]
async fn test_cross_site_links_not_followed() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="http://other.invalid/x">Elsewhere</a> <a href="/local">Local</a>"#,
    )
    .await;
    mount_page(&mock_server, "/local", "<p>Local page</p>").await;

    let output_dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::from_config(&create_test_config(&output_dir)).unwrap();

    let report = crawler
        .run(&format!("{}/", mock_server.uri()), 2, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 2);
    assert!(report
        .pages
        .iter()
        .all(|p| !p.source_url.contains("other.invalid")));
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn test_depth_limit() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/level1">Level 1</a>"#).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">Level 2</a>"#).await;
    mount_page(&mock_server, "/level2", r#"<a href="/level3">Level 3</a>"#).await;
    mount_page(&mock_server, "/level3", "<p>Too deep</p>").await;

    let output_dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::from_config(&create_test_config(&output_dir)).unwrap();

    let report = crawler
        .run(&format!("{}/", mock_server.uri()), 2, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.progress.skipped, 1);
    assert_eq!(hits(&mock_server, "/level3").await, 0);
}

#[tokio::test]
async fn test_dead_link_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Missing</a> <a href="/broken">Broken</a> <a href="/ok">Ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "<p>Fine</p>").await;

    let output_dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::from_config(&create_test_config(&output_dir)).unwrap();

    let report = crawler
        .run(&format!("{}/", mock_server.uri()), 1, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].state, PageState::DeadLink);
    assert_eq!(report.failures[1].state, PageState::HttpError);
    assert_eq!(report.progress.failed, 2);
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/doc.pdf">PDF</a> <a href="/charset">Charset</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/charset"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<p>Declared</p>", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let output_dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::from_config(&create_test_config(&output_dir)).unwrap();

    let report = crawler
        .run(&format!("{}/", mock_server.uri()), 1, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].state, PageState::ContentMismatch);
    assert!(report.pages.iter().any(|p| p.text == "Declared"));
}

#[tokio::test]
async fn test_redirect_target_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/old">Old</a> <a href="/new">New</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", "<p>New home</p>").await;

    let output_dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::from_config(&create_test_config(&output_dir)).unwrap();

    let report = crawler
        .run(&format!("{}/", base_url), 1, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(hits(&mock_server, "/new").await, 1);
    assert_eq!(report.pages.len(), 2);

    let redirected = report
        .pages
        .iter()
        .find(|p| p.source_url.ends_with("/old"))
        .unwrap();
    assert!(redirected.final_url.ends_with("/new"));
    assert_eq!(redirected.text, "New home");
}

#[tokio::test]
async fn test_redirect_to_already_fetched_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/new">New</a> <a href="/old">Old</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", "<p>New home</p>").await;

    let output_dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::from_config(&create_test_config(&output_dir)).unwrap();

    let report = crawler
        .run(&format!("{}/", base_url), 1, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(hits(&mock_server, "/new").await, 1);
    assert_eq!(hits(&mock_server, "/old").await, 1);
    assert_eq!(report.pages.len(), 2);
    assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 2);
    assert_eq!(report.progress.skipped, 1);
}

#[tokio::test]
async fn test_trailing_slash_link_requested_as_written() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/docs/">Docs</a>"#).await;
    mount_page(
        &mock_server,
        "/docs/",
        r#"<p>Docs index</p><a href="guide">Guide</a>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/guide", "<p>Guide</p>").await;

    let output_dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::from_config(&create_test_config(&output_dir)).unwrap();

    let report = crawler
        .run(&format!("{}/", mock_server.uri()), 2, &NoopObserver)
        .await
        .unwrap();

    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.pages.len(), 3);
    assert_eq!(hits(&mock_server, "/docs/").await, 1);
    assert_eq!(hits(&mock_server, "/docs").await, 0);
    assert_eq!(hits(&mock_server, "/docs/guide").await, 1);
}

#[tokio::test]
async fn test_progress_events_in_order() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/a">A</a> <a href="/b">B</a>"#).await;
    mount_page(&mock_server, "/a", "<p>A</p>").await;
    mount_page(&mock_server, "/b", "<p>B</p>").await;

    let output_dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::from_config(&create_test_config(&output_dir)).unwrap();

    let (tx, mut rx) = mpsc::channel::<CrawlEvent>(16);
    let report = crawler
        .run(&format!("{}/", mock_server.uri()), 1, &tx)
        .await
        .unwrap();
    drop(tx);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    let paths: Vec<_> = events
        .iter()
        .map(|e| url::Url::parse(&e.url).unwrap().path().to_string())
        .collect();
    assert_eq!(paths, vec!["/", "/a", "/b"]);
    assert_eq!(events[0].progress.queued, 2);
    assert_eq!(events[2].progress.saved, 3);
    assert!(events.iter().all(|e| e.state == PageState::Saved));
    assert_eq!(report.progress.saved, 3);
}

#[tokio::test]
async fn test_page_limit() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/1">1</a> <a href="/2">2</a> <a href="/3">3</a>"#,
    )
    .await;
    for page in ["/1", "/2", "/3"] {
        mount_page(&mock_server, page, "<p>Numbered</p>").await;
    }

    let output_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&output_dir);
    config.crawler.max_pages = 2;
    let crawler = Crawler::from_config(&config).unwrap();

    let report = crawler
        .run(&format!("{}/", mock_server.uri()), 1, &NoopObserver)
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 2);
    assert!(report.limit_reached);
}

#[tokio::test]
async fn test_invalid_seed_rejected() {
    let output_dir = tempfile::tempdir().unwrap();
    let crawler = Crawler::from_config(&create_test_config(&output_dir)).unwrap();

    assert!(crawler.run("ftp://example.com/", 1, &NoopObserver).await.is_err());
    assert!(crawler.run("", 1, &NoopObserver).await.is_err());
}
