//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small paginated catalog and run the
//! full crawl cycle end-to-end against it.

use catalog_walker::cache::{cache_key, FsPageStore, PageStore};
use catalog_walker::config::Config;
use catalog_walker::crawler::{crawl, Category, CrawlOrchestrator};
use catalog_walker::output::{MarkdownReport, ReportWriter};
use catalog_walker::WalkerError;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server's catalog
fn create_test_config(base_url: &str, cache_dir: &str) -> Config {
    let mut config = Config::default();
    config.site.seed_url = format!("{}/2024ironman/", base_url);
    config.crawler.batch_size = 2;
    config.crawler.request_timeout_secs = 5;
    config.request.user_agent = "TestBot/1.0".to_string();
    config.request.referer = String::new();
    config.output.cache_dir = cache_dir.to_string();
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn series(entries: &[(&str, &str)]) -> String {
    entries
        .iter()
        .map(|(title, href)| {
            format!(
                r#"<div class="articles-box"><h3 class="articles-topic"><a href="{}">{}</a></h3></div>"#,
                href, title
            )
        })
        .collect()
}

async fn mount_page(server: &MockServer, category: &str, page: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/2024ironman/{}", category)))
        .and(query_param("page", page))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mounts a catalog with three categories:
/// - ALL (reserved, never walked)
/// - ai: pages 1-2 list series (one repeated), pages 3-4 are empty
/// - web: page 1 lists a series, page 2 fails with HTTP 500, pages 3-4 are empty
async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/2024ironman/"))
        .respond_with(html(
            r##"<ul>
                <li class="class-bar-item"><a href="all#ir-list">ALL</a></li>
                <li class="class-bar-item"><a href="ai#ir-list">AI</a></li>
                <li class="class-bar-item"><a href="web#ir-list">Web</a></li>
            </ul>"##,
        ))
        .mount(server)
        .await;

    mount_page(
        server,
        "ai",
        "1",
        html(&series(&[
            ("Rust in 30 Days", "/users/1/ironman/101"),
            ("Tokio Deep Dive", "/users/2/ironman/102"),
        ])),
    )
    .await;
    mount_page(
        server,
        "ai",
        "2",
        html(&series(&[
            ("Tokio Deep Dive", "/users/2/ironman/102"),
            ("Embeddings 101", "/users/3/ironman/103"),
        ])),
    )
    .await;
    mount_page(server, "ai", "3", html("<p>No series</p>")).await;
    mount_page(server, "ai", "4", html("<p>No series</p>")).await;

    mount_page(
        server,
        "web",
        "1",
        html(&series(&[("CSS Tricks", "/users/4/ironman/201")])),
    )
    .await;
    mount_page(server, "web", "2", ResponseTemplate::new(500)).await;
    mount_page(server, "web", "3", html("")).await;
    mount_page(server, "web", "4", html("")).await;
}

#[tokio::test]
async fn test_full_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_catalog(&mock_server).await;

    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, cache_dir.path().to_str().unwrap());
    let store = Arc::new(FsPageStore::open(cache_dir.path()).unwrap());

    let report = crawl(config, store.clone()).await.expect("crawl failed");

    let names: Vec<&str> = report.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["AI", "Web"]);

    let ai = &report.categories[0];
    assert_eq!(ai.source_url, format!("{}/2024ironman/ai", base_url));
    let ai_titles: Vec<&str> = ai.items().iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        ai_titles,
        vec!["Rust in 30 Days", "Tokio Deep Dive", "Embeddings 101"]
    );
    assert_eq!(
        ai.items()[0].url,
        format!("{}/users/1/ironman/101", base_url)
    );

    let web = &report.categories[1];
    assert_eq!(web.items().len(), 1);
    assert_eq!(web.items()[0].title, "CSS Tricks");

    let stats = &report.stats;
    assert_eq!(stats.categories, 2);
    assert_eq!(stats.unique_items, 4);
    assert_eq!(stats.items_seen, 5);
    assert_eq!(stats.rounds, 4);
    assert_eq!(stats.pages_requested, 8);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.network_fetches, 9);
    assert_eq!(stats.cache_hits, 0);

    // Every successful fetch was cached, the failed page was not
    assert_eq!(store.len().unwrap(), 8);
    let failed_page = format!("{}/2024ironman/web?page=2", base_url);
    assert!(!store.contains(&failed_page));
    assert!(cache_dir
        .path()
        .join(format!("{}.html", cache_key(&format!("{}/2024ironman/", base_url))))
        .exists());

    // The reserved category was never requested
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| !r.url.path().starts_with("/2024ironman/all")));
}

#[tokio::test]
async fn test_second_run_is_served_from_cache() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_catalog(&mock_server).await;

    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, cache_dir.path().to_str().unwrap());

    let first = crawl(
        config.clone(),
        Arc::new(FsPageStore::open(cache_dir.path()).unwrap()),
    )
    .await
    .unwrap();
    let requests_after_first = mock_server.received_requests().await.unwrap().len();
    assert_eq!(requests_after_first, 9);

    // A new store over the same directory, as in a separate run
    let second = crawl(
        config,
        Arc::new(FsPageStore::open(cache_dir.path()).unwrap()),
    )
    .await
    .unwrap();
    let requests_after_second = mock_server.received_requests().await.unwrap().len();

    // Only the page that failed is requested again
    assert_eq!(requests_after_second - requests_after_first, 1);
    assert_eq!(second.stats.network_fetches, 1);
    assert_eq!(second.stats.cache_hits, 8);

    let render = |categories: &[Category]| MarkdownReport::new("Catalog").render(categories);
    assert_eq!(render(&first.categories), render(&second.categories));
}

#[tokio::test]
async fn test_report_lists_every_series() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_catalog(&mock_server).await;

    let cache_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&base_url, cache_dir.path().to_str().unwrap());
    config.output.report_title = "Series by Category".to_string();

    let writer = MarkdownReport::new(config.output.report_title.clone());
    let report = crawl(
        config,
        Arc::new(FsPageStore::open(cache_dir.path()).unwrap()),
    )
    .await
    .unwrap();

    let report_path = cache_dir.path().join("topics.md");
    writer.write_to(&report.categories, &report_path).unwrap();
    let markdown = std::fs::read_to_string(&report_path).unwrap();

    let expected = format!(
        "# Series by Category\n\n\
         ## AI\n\n\
         - [Rust in 30 Days]({base}/users/1/ironman/101)\n\
         - [Tokio Deep Dive]({base}/users/2/ironman/102)\n\
         - [Embeddings 101]({base}/users/3/ironman/103)\n\n\
         ## Web\n\n\
         - [CSS Tricks]({base}/users/4/ironman/201)\n\n",
        base = base_url
    );
    assert_eq!(markdown, expected);
}

#[tokio::test]
async fn test_seed_failure_aborts_run() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024ironman/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), cache_dir.path().to_str().unwrap());
    let store = Arc::new(FsPageStore::open(cache_dir.path()).unwrap());

    let orchestrator = CrawlOrchestrator::new(config, store.clone()).unwrap();
    let result = orchestrator.run().await;

    match result {
        Err(WalkerError::SeedUnreachable { source, .. }) => {
            assert!(source.to_string().contains("503"));
        }
        Err(other) => panic!("expected SeedUnreachable, got {}", other),
        Ok(_) => panic!("expected SeedUnreachable, got a report"),
    }

    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn test_walk_issues_no_request_past_exhaustion() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_catalog(&mock_server).await;

    // Page 5 would only be requested by a third ai round
    Mock::given(method("GET"))
        .and(path("/2024ironman/ai"))
        .and(query_param("page", "5"))
        .respond_with(html(&series(&[("Too Far", "/users/9/ironman/999")])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cache_dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, cache_dir.path().to_str().unwrap());
    let report = crawl(
        config,
        Arc::new(FsPageStore::open(cache_dir.path()).unwrap()),
    )
    .await
    .unwrap();

    assert_eq!(report.categories[0].items().len(), 3);
}
