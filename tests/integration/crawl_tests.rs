//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a small catalog and run the full
//! pipeline end-to-end: pagination, listing pages, item pages, output.

use catalog_harvest::config::{Config, ErrorPolicy};
use catalog_harvest::crawler::{FetchError, Harvester, PaginationError};
use catalog_harvest::output::JsonLinesEmitter;
use catalog_harvest::HarvestError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given policy and item concurrency
fn create_test_config(error_policy: ErrorPolicy, item_concurrency: u32) -> Config {
    let mut config = Config::default();
    config.crawler.error_policy = error_policy;
    config.crawler.item_concurrency = item_concurrency;
    config.user_agent.crawler_name = "TestHarvester".to_string();
    config
}

fn catalog_root(pagination: &str) -> String {
    format!(
        r#"<html><head><title>Catalog</title></head><body>
        <div class="pages">{pagination}</div>
        </body></html>"#
    )
}

fn listing_page(links: &[&str]) -> String {
    let posts: String = links
        .iter()
        .map(|link| format!(r#"<h2 class="post-title"><a href="{link}">{link}</a></h2>"#))
        .collect();
    format!("<html><body>{posts}</body></html>")
}

fn item_page(title: &str, tags: &[&str]) -> String {
    let tag_links: String = tags
        .iter()
        .map(|tag| format!(r#"<a href="/tag/{tag}/">{tag}</a>"#))
        .collect();
    format!(
        r#"<html><body>
        <div class="post-inner group">
            <h1>{title}</h1>
            <div class="entry-inner">
                <p>Description: The {title} loop Genres: Electronic Artist: Producer{title}</p>
                <table><tbody>
                    <tr><td>Quality: 320kbps</td></tr>
                    <tr><td>Duration: 03: 45</td></tr>
                    <tr><td><a href="/files/{title}.pdf">Sheet</a></td></tr>
                    <tr><td><a href="/files/{title}.zip">Download</a></td></tr>
                </tbody></table>
            </div>
            <div class="post-tags">{tag_links}</div>
        </div>
        </body></html>"#
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected)
        .mount(server)
        .await;
}

/// Parses emitted JSON Lines output
fn parse_lines(output: Vec<u8>) -> Vec<serde_json::Value> {
    String::from_utf8(output)
        .expect("Output is not UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Line is not JSON"))
        .collect()
}

fn titles(records: &[serde_json::Value]) -> Vec<String> {
    records
        .iter()
        .map(|record| record["Title"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Mounts a three-page catalog under /catalog/ with items a, b, c
///
/// Item `a` is listed on both page 1 and page 3.
async fn mount_three_page_catalog(server: &MockServer) {
    mount_html(server, "/catalog/", catalog_root("Page 2 of 3"), 1).await;
    mount_html(
        server,
        "/catalog/page/1",
        listing_page(&["/item/a/", "/item/b/"]),
        1,
    )
    .await;
    mount_html(server, "/catalog/page/2", listing_page(&["/item/c/"]), 1).await;
    mount_html(server, "/catalog/page/3", listing_page(&["/item/a/"]), 1).await;
    mount_status(server, "/catalog/page/4", 404, 0).await;
}

#[tokio::test]
async fn test_full_harvest_three_pages() {
    let mock_server = MockServer::start().await;
    mount_three_page_catalog(&mock_server).await;
    mount_html(&mock_server, "/item/a/", item_page("Alpha", &["deep", "house"]), 2).await;
    mount_html(&mock_server, "/item/b/", item_page("Bravo", &[]), 1).await;
    mount_html(&mock_server, "/item/c/", item_page("Charlie", &["techno"]), 1).await;

    let seeds = vec![format!("{}/catalog/", mock_server.uri())];
    let mut harvester =
        Harvester::new(create_test_config(ErrorPolicy::Abort, 1)).expect("Failed to create");
    let mut sink = JsonLinesEmitter::new(Vec::new());

    harvester.run(&seeds, &mut sink).await.expect("Harvest failed");

    let records = parse_lines(sink.into_inner());
    assert_eq!(titles(&records), vec!["Alpha", "Bravo", "Charlie", "Alpha"]);

    let alpha = &records[0];
    assert_eq!(alpha["Description"], "The Alpha loop");
    assert_eq!(alpha["Genres"], "Electronic");
    assert_eq!(alpha["Artist"], "ProducerAlpha");
    assert_eq!(alpha["MusicDetail"]["Quality"], " 320kbps");
    assert_eq!(alpha["MusicDetail"]["Duration"], "03:45");
    assert_eq!(alpha["MusicDetail"]["Tempo"], "");
    assert_eq!(alpha["DownloadUrl"], "/files/Alpha.zip");
    assert_eq!(alpha["Tags"], "deep,house");
    assert_eq!(records[1]["Tags"], "");

    let stats = harvester.stats();
    assert_eq!(stats.seeds_completed, 1);
    assert_eq!(stats.listing_pages, 3);
    assert_eq!(stats.item_links, 4);
    assert_eq!(stats.records_emitted, 4);
}

#[tokio::test]
async fn test_no_pagination_fails_seed() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/catalog/",
        "<html><body><p>Just one page</p></body></html>".to_string(),
        1,
    )
    .await;
    mount_status(&mock_server, "/catalog/page/1", 404, 0).await;

    let seeds = vec![format!("{}/catalog/", mock_server.uri())];
    let mut harvester = Harvester::new(create_test_config(ErrorPolicy::Abort, 1)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    let err = harvester.run(&seeds, &mut sink).await.unwrap_err();
    match err {
        HarvestError::Pagination { url, source } => {
            assert_eq!(url, seeds[0]);
            assert_eq!(source, PaginationError::NoPagination);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(sink.into_inner().is_empty());
}

#[tokio::test]
async fn test_page_count_parse_failure() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/catalog/", catalog_root("Page one of many"), 1).await;

    let seeds = vec![format!("{}/catalog/", mock_server.uri())];
    let mut harvester = Harvester::new(create_test_config(ErrorPolicy::Abort, 1)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    let err = harvester.run(&seeds, &mut sink).await.unwrap_err();
    assert!(matches!(
        err,
        HarvestError::Pagination {
            source: PaginationError::PageCountParse { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_item_failure_aborts_run() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/catalog/", catalog_root("Page 1 of 3"), 1).await;
    mount_html(
        &mock_server,
        "/catalog/page/1",
        listing_page(&["/item/a/", "/item/b/", "/item/c/"]),
        1,
    )
    .await;
    mount_status(&mock_server, "/catalog/page/2", 404, 0).await;
    mount_html(&mock_server, "/item/a/", item_page("Alpha", &[]), 1).await;
    mount_status(&mock_server, "/item/b/", 500, 1).await;
    mount_status(&mock_server, "/item/c/", 404, 0).await;

    let seeds = vec![format!("{}/catalog/", mock_server.uri())];
    let mut harvester = Harvester::new(create_test_config(ErrorPolicy::Abort, 1)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    let err = harvester.run(&seeds, &mut sink).await.unwrap_err();
    match err {
        HarvestError::Fetch {
            url,
            source: FetchError::Status(status),
        } => {
            assert!(url.ends_with("/item/b/"), "unexpected url {}", url);
            assert_eq!(status.as_u16(), 500);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // Records emitted before the failure stay emitted
    let records = parse_lines(sink.into_inner());
    assert_eq!(titles(&records), vec!["Alpha"]);
}

#[tokio::test]
async fn test_skip_failed_items() {
    let mock_server = MockServer::start().await;
    mount_three_page_catalog(&mock_server).await;
    mount_html(&mock_server, "/item/a/", item_page("Alpha", &[]), 2).await;
    mount_status(&mock_server, "/item/b/", 404, 1).await;
    mount_html(&mock_server, "/item/c/", item_page("Charlie", &[]), 1).await;

    let seeds = vec![format!("{}/catalog/", mock_server.uri())];
    let mut harvester =
        Harvester::new(create_test_config(ErrorPolicy::SkipFailedItems, 1)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    harvester.run(&seeds, &mut sink).await.expect("Harvest failed");

    let records = parse_lines(sink.into_inner());
    assert_eq!(titles(&records), vec!["Alpha", "Charlie", "Alpha"]);
    assert_eq!(harvester.stats().items_skipped, 1);
    assert_eq!(harvester.stats().records_emitted, 3);
}

#[tokio::test]
async fn test_continue_on_seed_error() {
    let mock_server = MockServer::start().await;

    // First seed has no pagination, second is a one-page catalog
    mount_html(
        &mock_server,
        "/broken/",
        "<html><body></body></html>".to_string(),
        1,
    )
    .await;
    mount_html(&mock_server, "/working/", catalog_root("Page 1 of 1"), 1).await;
    mount_html(
        &mock_server,
        "/working/page/1",
        listing_page(&["/item/z/"]),
        1,
    )
    .await;
    mount_html(&mock_server, "/item/z/", item_page("Zulu", &["x"]), 1).await;

    let seeds = vec![
        format!("{}/broken/", mock_server.uri()),
        format!("{}/working/", mock_server.uri()),
    ];
    let mut harvester =
        Harvester::new(create_test_config(ErrorPolicy::ContinueOnSeedError, 1)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    let err = harvester.run(&seeds, &mut sink).await.unwrap_err();
    assert!(matches!(
        err,
        HarvestError::SeedsFailed {
            failed: 1,
            total: 2
        }
    ));

    let records = parse_lines(sink.into_inner());
    assert_eq!(titles(&records), vec!["Zulu"]);
    assert_eq!(harvester.stats().seeds_failed, 1);
    assert_eq!(harvester.stats().seeds_completed, 1);
}

#[tokio::test]
async fn test_abort_stops_before_next_seed() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/broken/", 503, 1).await;
    mount_html(&mock_server, "/working/", catalog_root("Page 1 of 1"), 0).await;

    let seeds = vec![
        format!("{}/broken/", mock_server.uri()),
        format!("{}/working/", mock_server.uri()),
    ];
    let mut harvester = Harvester::new(create_test_config(ErrorPolicy::Abort, 1)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    let err = harvester.run(&seeds, &mut sink).await.unwrap_err();
    assert!(matches!(err, HarvestError::Fetch { .. }));
}

#[tokio::test]
async fn test_listing_page_failure_fails_seed() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/catalog/", catalog_root("Page 1 of 2"), 1).await;
    mount_html(&mock_server, "/catalog/page/1", listing_page(&["/item/a/"]), 1).await;
    mount_status(&mock_server, "/catalog/page/2", 500, 1).await;
    mount_html(&mock_server, "/item/a/", item_page("Alpha", &[]), 1).await;

    let seeds = vec![format!("{}/catalog/", mock_server.uri())];
    let mut harvester =
        Harvester::new(create_test_config(ErrorPolicy::SkipFailedItems, 1)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    // Listing failures are seed-level even when items may be skipped
    let err = harvester.run(&seeds, &mut sink).await.unwrap_err();
    assert!(matches!(err, HarvestError::SeedsFailed { failed: 1, .. }));

    let records = parse_lines(sink.into_inner());
    assert_eq!(titles(&records), vec!["Alpha"]);
}

#[tokio::test]
async fn test_concurrent_items_keep_listing_order() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/catalog/", catalog_root("Page 1 of 1"), 1).await;
    mount_html(
        &mock_server,
        "/catalog/page/1",
        listing_page(&["/item/slow/", "/item/fast/", "/item/mid/"]),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/item/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(item_page("Slow", &[]))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/item/fast/", item_page("Fast", &[]), 1).await;
    Mock::given(method("GET"))
        .and(path("/item/mid/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(item_page("Mid", &[]))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let seeds = vec![format!("{}/catalog/", mock_server.uri())];
    let mut harvester = Harvester::new(create_test_config(ErrorPolicy::Abort, 3)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    harvester.run(&seeds, &mut sink).await.expect("Harvest failed");

    let records = parse_lines(sink.into_inner());
    assert_eq!(titles(&records), vec!["Slow", "Fast", "Mid"]);
}

#[tokio::test]
async fn test_blank_seed_fails_fetch() {
    let seeds = vec![String::new()];
    let mut harvester = Harvester::new(create_test_config(ErrorPolicy::Abort, 1)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    let err = harvester.run(&seeds, &mut sink).await.unwrap_err();
    assert!(matches!(
        err,
        HarvestError::Fetch {
            source: FetchError::MissingUrl,
            ..
        }
    ));
}

/// Listing page whose first post title carries no link
fn listing_page_with_unlinked_post(link: &str) -> String {
    format!(
        r#"<html><body>
        <h2 class="post-title">No link</h2>
        <h2 class="post-title"><a href="{link}">{link}</a></h2>
        </body></html>"#
    )
}

#[tokio::test]
async fn test_unlinked_post_aborts_run() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/catalog/", catalog_root("Page 1 of 1"), 1).await;
    mount_html(
        &mock_server,
        "/catalog/page/1",
        listing_page_with_unlinked_post("/item/a/"),
        1,
    )
    .await;
    mount_html(&mock_server, "/item/a/", item_page("Alpha", &[]), 0).await;

    let seeds = vec![format!("{}/catalog/", mock_server.uri())];
    let mut harvester = Harvester::new(create_test_config(ErrorPolicy::Abort, 1)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    let err = harvester.run(&seeds, &mut sink).await.unwrap_err();
    assert!(matches!(
        err,
        HarvestError::Fetch {
            source: FetchError::MissingUrl,
            ..
        }
    ));
    assert_eq!(harvester.stats().item_links, 2);
    assert!(parse_lines(sink.into_inner()).is_empty());
}

#[tokio::test]
async fn test_unlinked_post_skipped_and_counted() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/catalog/", catalog_root("Page 1 of 1"), 1).await;
    mount_html(
        &mock_server,
        "/catalog/page/1",
        listing_page_with_unlinked_post("/item/a/"),
        1,
    )
    .await;
    mount_html(&mock_server, "/item/a/", item_page("Alpha", &[]), 1).await;

    let seeds = vec![format!("{}/catalog/", mock_server.uri())];
    let mut harvester =
        Harvester::new(create_test_config(ErrorPolicy::SkipFailedItems, 1)).unwrap();
    let mut sink = JsonLinesEmitter::new(Vec::new());

    harvester.run(&seeds, &mut sink).await.expect("Harvest failed");

    let records = parse_lines(sink.into_inner());
    assert_eq!(titles(&records), vec!["Alpha"]);
    assert_eq!(harvester.stats().item_links, 2);
    assert_eq!(harvester.stats().items_skipped, 1);
    assert_eq!(harvester.stats().records_emitted, 1);
}
