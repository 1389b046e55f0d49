//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use frontier_crawler::config::{load_config, Config};
use frontier_crawler::crawler::{CrawlResult, Engine};
use frontier_crawler::output::ConsoleSink;
use frontier_crawler::FetchStatus;
use std::io::Write;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay and a short idle poll
fn create_test_config(max_depth: u32, workers: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.workers = workers;
    config.crawler.per_host_delay = 0;
    config.crawler.fetch_timeout = 5;
    config.crawler.idle_poll = 20;
    config
}

fn html_page(links: &[String]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">link</a>"#, link))
        .collect();
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", anchors))
        .insert_header("content-type", "text/html")
}

fn find<'a>(results: &'a [CrawlResult], url: &str) -> &'a CrawlResult {
    results
        .iter()
        .find(|r| r.url == url)
        .unwrap_or_else(|| panic!("no result for {}", url))
}

/// A port with nothing listening on it
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_full_crawl_respects_depth_and_dedup() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Root links to two children (and to itself)
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&[
            format!("{}/a", base_url),
            format!("{}/b", base_url),
            format!("{}/", base_url),
        ]))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Both children link back to the root and on to a grandchild
    for child in ["/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(child))
            .respond_with(html_page(&[
                format!("{}/", base_url),
                format!("{}/c", base_url),
            ]))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    // Depth 2 is at the ceiling and must never be requested
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(&mock_server)
        .await;

    let engine = Engine::new(&create_test_config(2, 2)).unwrap();
    let mut results: Vec<CrawlResult> = Vec::new();
    let summary = engine.crawl(&base_url, &mut results).await.unwrap();

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.status == FetchStatus::Fetched));

    let root = find(&results, &format!("{}/", base_url));
    assert_eq!(root.depth, 0);
    assert_eq!(root.links.len(), 3);

    let child = find(&results, &format!("{}/a", base_url));
    assert_eq!(child.depth, 1);
    assert_eq!(child.links.len(), 2);

    assert_eq!(summary.stats.count(FetchStatus::Fetched), 3);
    assert_eq!(summary.frontier.completed, 3);
    assert_eq!(summary.results_dropped, 0);
}

// The seed takes far longer than the idle poll interval, so idle workers
// poll an empty frontier many times while it is in flight. None of them may
// give up before the seed's links arrive.
#[tokio::test]
async fn test_slow_seed_does_not_starve_workers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let children: Vec<String> = (0..10).map(|i| format!("{}/p{}", base_url, i)).collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&children).set_delay(Duration::from_millis(400)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html_page(&[]))
        .mount(&mock_server)
        .await;

    let engine = Engine::new(&create_test_config(2, 4)).unwrap();
    let mut results: Vec<CrawlResult> = Vec::new();
    engine.crawl(&base_url, &mut results).await.unwrap();

    assert_eq!(results.len(), 11);
    for child in &children {
        let result = find(&results, child);
        assert_eq!(result.status, FetchStatus::Fetched);
        assert_eq!(result.depth, 1);
    }
}

#[tokio::test]
async fn test_redirects_are_reported_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let target = format!("{}/new", base_url);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&[format!("{}/old", base_url)]))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(&mock_server)
        .await;

    let engine = Engine::new(&create_test_config(3, 2)).unwrap();
    let mut results: Vec<CrawlResult> = Vec::new();
    let summary = engine.crawl(&base_url, &mut results).await.unwrap();

    assert_eq!(results.len(), 2);
    let redirect = find(&results, &format!("{}/old", base_url));
    assert_eq!(redirect.status, FetchStatus::Redirect);
    assert_eq!(redirect.status_code, Some(301));
    assert_eq!(redirect.redirect_target.as_deref(), Some(target.as_str()));
    assert!(redirect.links.is_empty());
    assert_eq!(summary.stats.count(FetchStatus::Redirect), 1);
}

#[tokio::test]
async fn test_failures_are_results_not_errors() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dead = format!("http://127.0.0.1:{}/", closed_port());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&[dead.clone(), format!("{}/missing", base_url)]))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let engine = Engine::new(&create_test_config(2, 3)).unwrap();
    let mut results: Vec<CrawlResult> = Vec::new();
    let summary = engine.crawl(&base_url, &mut results).await.unwrap();

    assert_eq!(results.len(), 3);

    let unreachable = find(&results, &dead);
    assert_eq!(unreachable.status, FetchStatus::Error);
    assert!(unreachable.error.is_some());

    let missing = find(&results, &format!("{}/missing", base_url));
    assert_eq!(missing.status, FetchStatus::Fetched);
    assert_eq!(missing.status_code, Some(404));

    assert_eq!(summary.stats.count(FetchStatus::Error), 1);
    assert_eq!(summary.stats.count(FetchStatus::Fetched), 2);
}

#[tokio::test]
async fn test_same_host_pacing_across_workers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&[
            format!("{}/1", base_url),
            format!("{}/2", base_url),
        ]))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html_page(&[]))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(2, 3);
    config.crawler.per_host_delay = 200;
    let engine = Engine::new(&config).unwrap();

    let start = Instant::now();
    let mut results: Vec<CrawlResult> = Vec::new();
    engine.crawl(&base_url, &mut results).await.unwrap();

    // Three requests to one host need at least two gaps
    assert_eq!(results.len(), 3);
    assert!(start.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_shutdown_stops_crawl_after_in_flight_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let children: Vec<String> = (0..5).map(|i| format!("{}/p{}", base_url, i)).collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&children).set_delay(Duration::from_millis(500)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html_page(&[]))
        .expect(0)
        .mount(&mock_server)
        .await;

    let engine = Engine::new(&create_test_config(3, 2)).unwrap();
    let shutdown = engine.shutdown_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.shutdown();
    });

    let mut results: Vec<CrawlResult> = Vec::new();
    engine.crawl(&base_url, &mut results).await.unwrap();

    // The in-flight seed is still reported; its links land on a closed frontier
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, FetchStatus::Fetched);
    assert_eq!(engine.frontier().stats().seen, 1);
}

#[tokio::test]
async fn test_crawl_from_config_file_to_console() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&[format!("{}/next", base_url)]))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page(&[]))
        .mount(&mock_server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[crawler]
max-depth = 1
workers = 2
per-host-delay = 0
idle-poll = 10

[user-agent]
crawler-name = "TestBot"
crawler-version = "0.1"
contact-url = "https://example.com/contact"
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    let engine = Engine::new(&config).unwrap();

    let mut sink = ConsoleSink::new(Vec::new());
    engine.crawl(&base_url, &mut sink).await.unwrap();
    let output = String::from_utf8(sink.into_inner()).unwrap();

    // max-depth = 1 fetches the seed only
    assert!(output.contains(&format!("=== CRAWLED: {}/ ===", base_url)));
    assert!(output.contains("Links Found: 1"));
    assert!(!output.contains("/next ==="));
}
