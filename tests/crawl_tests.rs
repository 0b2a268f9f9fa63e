//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use page_harvester::config::{Config, CrawlerConfig};
use page_harvester::crawler::{CrawlEngine, CrawlEvent, CrawlState, ROBOTS_DISALLOWED};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with a short delay and timeout
fn create_test_config(respect_robots: bool) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_pages: 50,
            delay_seconds: 0.1,
            timeout_seconds: 5,
            respect_robots,
        },
        ..Config::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_chain_of_five_pages_respects_delay() {
    let server = MockServer::start().await;

    for i in 0..5 {
        let body = if i < 4 {
            format!(r#"<p>Page {}</p><a href="/p{}">next</a>"#, i, i + 1)
        } else {
            "<p>Last page</p>".to_string()
        };
        mount_page(&server, &format!("/p{}", i), &body).await;
    }

    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let started = Instant::now();
    let session = engine
        .start(&format!("{}/p0", server.uri()), 10, 0.1)
        .await;
    let elapsed = started.elapsed();

    assert_eq!(session.state(), CrawlState::Completed);
    assert_eq!(session.results().len(), 5);
    assert!(session.results().iter().all(|p| p.is_success()));
    assert!(
        elapsed >= Duration::from_millis(400),
        "crawl took only {:?}",
        elapsed
    );

    // Breadth-first along the chain
    let urls: Vec<_> = session.results().iter().map(|p| p.url.clone()).collect();
    for (i, url) in urls.iter().enumerate() {
        assert!(url.ends_with(&format!("/p{}", i)), "unexpected order: {:?}", urls);
    }
}

#[tokio::test]
async fn test_self_link_terminates_after_one_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r##"<a href="/">home</a><a href="#top">top</a><a href="/#x">again</a>"##))
        .expect(1)
        .mount(&server)
        .await;

    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let session = engine.start(&format!("{}/", server.uri()), 10, 0.1).await;

    assert_eq!(session.state(), CrawlState::Completed);
    assert_eq!(session.results().len(), 1);
    assert_eq!(session.visited_count(), 1);
}

#[tokio::test]
async fn test_max_pages_limits_visits() {
    let server = MockServer::start().await;

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/page{}">{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &links).await;
    for i in 0..10 {
        // Every page links back to the hub and to its neighbour
        let body = format!(r#"<a href="/">hub</a><a href="/page{}">next</a>"#, (i + 1) % 10);
        mount_page(&server, &format!("/page{}", i), &body).await;
    }

    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let session = engine.start(&format!("{}/", server.uri()), 3, 0.1).await;

    assert_eq!(session.state(), CrawlState::Completed);
    assert_eq!(session.results().len(), 3);

    let distinct: HashSet<_> = session.results().iter().map(|p| p.url.as_str()).collect();
    assert_eq!(distinct.len(), 3, "a URL was visited twice");
}

#[tokio::test]
async fn test_no_url_is_revisited() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/b">b</a><a href="/">home</a>"#).await;
    mount_page(&server, "/b", r#"<a href="/a">a</a><a href="/">home</a>"#).await;

    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let session = engine.start(&format!("{}/", server.uri()), 50, 0.1).await;

    assert_eq!(session.state(), CrawlState::Completed);
    assert_eq!(session.results().len(), 3);
    let distinct: HashSet<_> = session.results().iter().map(|p| p.url.as_str()).collect();
    assert_eq!(distinct.len(), 3);
}

#[tokio::test]
async fn test_failed_pages_are_recorded_and_crawl_continues() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/missing">gone</a><a href="/data.json">data</a><a href="/ok">ok</a>"#,
    )
    .await;
    mount_page(&server, "/ok", "<p>Fine</p>").await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let session = engine.start(&format!("{}/", server.uri()), 10, 0.1).await;

    assert_eq!(session.state(), CrawlState::Completed);
    assert_eq!(session.results().len(), 4);

    let find = |suffix: &str| {
        session
            .results()
            .iter()
            .find(|p| p.url.ends_with(suffix))
            .unwrap_or_else(|| panic!("no record for {}", suffix))
    };

    let missing = find("/missing");
    assert!(!missing.is_success());
    assert_eq!(missing.status.reason(), Some("HTTP 404"));
    assert!(missing.tables.is_empty());
    assert!(missing.links.internal.is_empty());

    let data = find("/data.json");
    assert!(!data.is_success());
    assert!(data.status.reason().unwrap().contains("not HTML"));

    assert!(find("/ok").is_success());

    let stats = session.results().statistics();
    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 2);
}

#[tokio::test]
async fn test_malformed_seed_fails() {
    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();

    for seed in ["ftp://example.com/", "http://", "not a url at all"] {
        let session = engine.start(seed, 5, 0.1).await;
        assert_eq!(session.state(), CrawlState::Failed, "seed {:?}", seed);
        assert!(session.failure().is_some());
        assert!(session.results().is_empty());
    }
}

#[tokio::test]
async fn test_out_of_range_limits_fail() {
    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();

    assert_eq!(
        engine.start("https://example.com/", 0, 0.5).await.state(),
        CrawlState::Failed
    );
    assert_eq!(
        engine.start("https://example.com/", 5, 11.0).await.state(),
        CrawlState::Failed
    );
}

#[tokio::test]
async fn test_external_links_are_not_followed() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &server,
        "/",
        &format!(r#"<a href="{}/elsewhere">out</a><a href="/in">in</a>"#, other.uri()),
    )
    .await;
    mount_page(&server, "/in", "<p>inside</p>").await;

    Mock::given(method("GET"))
        .respond_with(html("<p>should not be fetched</p>"))
        .expect(0)
        .mount(&other)
        .await;

    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let session = engine.start(&format!("{}/", server.uri()), 10, 0.1).await;

    assert_eq!(session.results().len(), 2);
    let home = &session.results().pages()[0];
    assert_eq!(home.links.external.len(), 1);
    assert_eq!(home.links.internal.len(), 1);
}

#[tokio::test]
async fn test_stop_request_ends_crawl() {
    let server = MockServer::start().await;

    let links: String = (0..5).map(|i| format!(r#"<a href="/p{}">{}</a>"#, i, i)).collect();
    mount_page(&server, "/", &links).await;
    for i in 0..5 {
        mount_page(&server, &format!("/p{}", i), "<p>leaf</p>").await;
    }

    let mut engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let mut events = engine.subscribe();
    let stop = engine.stop_handle();
    let seed = format!("{}/", server.uri());

    // The stopper runs while the crawl sleeps between pages
    let (session, _) = tokio::join!(engine.start(&seed, 10, 0.3), async {
        while let Some(event) = events.recv().await {
            if matches!(event, CrawlEvent::PageProcessed(_)) {
                stop.stop();
                break;
            }
        }
    });

    assert_eq!(session.state(), CrawlState::Stopped);
    assert_eq!(session.results().len(), 1);
}

#[tokio::test]
async fn test_robots_disallowed_urls_are_recorded_not_fetched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .mount(&server)
        .await;

    mount_page(
        &server,
        "/",
        r#"<a href="/private/page">secret</a><a href="/public">open</a>"#,
    )
    .await;
    mount_page(&server, "/public", "<p>hello</p>").await;

    Mock::given(method("GET"))
        .and(path("/private/page"))
        .respond_with(html("<p>secret</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let engine = CrawlEngine::new(&create_test_config(true)).unwrap();
    let session = engine.start(&format!("{}/", server.uri()), 10, 0.1).await;

    assert_eq!(session.state(), CrawlState::Completed);
    assert_eq!(session.results().len(), 3);

    let private = session
        .results()
        .iter()
        .find(|p| p.url.ends_with("/private/page"))
        .expect("disallowed URL should still be recorded");
    assert_eq!(private.status.reason(), Some(ROBOTS_DISALLOWED));
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/a">a</a>"#).await;
    mount_page(&server, "/a", "<p>a</p>").await;

    let engine = CrawlEngine::new(&create_test_config(true)).unwrap();
    let session = engine.start(&format!("{}/", server.uri()), 10, 0.1).await;

    assert_eq!(session.results().len(), 2);
    assert!(session.results().iter().all(|p| p.is_success()));
}

#[tokio::test]
async fn test_progress_events() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<table><tr><td>1</td></tr></table><a href="/next">n</a><a href="https://example.org/">x</a>"#,
    )
    .await;
    mount_page(&server, "/next", "<p>end</p>").await;

    let mut engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let mut events = engine.subscribe();
    let session = engine.start(&format!("{}/", server.uri()), 10, 0.1).await;
    assert_eq!(session.state(), CrawlState::Completed);

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    assert_eq!(received.len(), 4, "events: {:?}", received);
    assert!(matches!(
        received[0],
        CrawlEvent::Started { max_pages: 10, .. }
    ));

    match &received[1] {
        CrawlEvent::PageProcessed(progress) => {
            assert_eq!(progress.pages_done, 1);
            assert_eq!(progress.tables_found, 1);
            assert_eq!(progress.links_found, 2);
            assert!(progress.url.ends_with('/'));
        }
        other => panic!("expected progress, got {:?}", other),
    }

    match &received[2] {
        CrawlEvent::PageProcessed(progress) => {
            assert_eq!(progress.pages_done, 2);
            assert_eq!(progress.succeeded, 2);
            assert_eq!(progress.failed, 0);
        }
        other => panic!("expected progress, got {:?}", other),
    }

    match &received[3] {
        CrawlEvent::Finished { state, pages, .. } => {
            assert_eq!(*state, CrawlState::Completed);
            assert_eq!(*pages, 2);
        }
        other => panic!("expected finish, got {:?}", other),
    }
}

#[tokio::test]
async fn test_crawl_all_concatenates_sessions() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    mount_page(&first, "/", r#"<a href="/a">a</a>"#).await;
    mount_page(&first, "/a", "<p>a</p>").await;
    mount_page(&second, "/", "<p>only page</p>").await;

    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let seeds = vec![
        format!("{}/", first.uri()),
        "ftp://invalid.example/".to_string(),
        format!("{}/", second.uri()),
    ];
    let results = engine.crawl_all(&seeds).await;

    assert_eq!(results.len(), 3);
    assert!(results.pages()[2].url.starts_with(&second.uri()));
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>home</p>").await;

    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let seed = format!("{}/", server.uri());

    let first = engine.start(&seed, 5, 0.1).await;
    let second = engine.start(&seed, 5, 0.1).await;

    assert_eq!(first.results().len(), 1);
    assert_eq!(second.results().len(), 1);
}

#[tokio::test]
async fn test_loop_repeats_batch_and_accumulates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("<p>home</p>"))
        .expect(3)
        .mount(&server)
        .await;

    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let stop = engine.stop_handle();
    let seeds = vec![format!("{}/", server.uri())];

    let mut seen = Vec::new();
    let results = engine
        .crawl_loop(&seeds, Duration::from_millis(50), |cycle, results| {
            seen.push((cycle, results.len()));
            if cycle == 3 {
                stop.stop();
            }
        })
        .await;

    assert_eq!(seen, vec![(1, 1), (2, 2), (3, 3)]);
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_stop_cuts_loop_pause_short() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>home</p>").await;

    let engine = CrawlEngine::new(&create_test_config(false)).unwrap();
    let stop = engine.stop_handle();
    let seeds = vec![format!("{}/", server.uri())];

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        stop.stop();
    });

    let started = Instant::now();
    let mut cycles = 0;
    let results = tokio::time::timeout(
        Duration::from_secs(10),
        engine.crawl_loop(&seeds, Duration::from_secs(3600), |_, _| cycles += 1),
    )
    .await
    .expect("stop should end the pause between cycles");

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(cycles, 1);
    assert_eq!(results.len(), 1);
}
