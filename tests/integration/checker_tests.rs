//! Link checking against mock servers

use crate::common::fast_options;
use link_sonar::config::FetcherConfig;
use link_sonar::job::{JobOptions, LinkStatus};
use link_sonar::LinkChecker;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn checker() -> LinkChecker {
    LinkChecker::new(&FetcherConfig::default()).unwrap()
}

async fn respond(server: &MockServer, verb: &str, route: &str, status: u16) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_not_found_is_dead() {
    let server = MockServer::start().await;
    respond(&server, "HEAD", "/gone", 404).await;

    let result = checker().probe(&format!("{}/gone", server.uri())).await;

    assert_eq!(result.status, LinkStatus::Dead);
    assert_eq!(result.status_code, Some(404));
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn test_head_not_allowed_retries_with_get() {
    let server = MockServer::start().await;
    respond(&server, "HEAD", "/no-head", 405).await;
    respond(&server, "GET", "/no-head", 200).await;
    respond(&server, "HEAD", "/no-head-gone", 405).await;
    respond(&server, "GET", "/no-head-gone", 404).await;

    let alive = checker().probe(&format!("{}/no-head", server.uri())).await;
    assert_eq!(alive.status, LinkStatus::Alive);
    assert_eq!(alive.status_code, Some(200));

    let dead = checker()
        .probe(&format!("{}/no-head-gone", server.uri()))
        .await;
    assert_eq!(dead.status, LinkStatus::Dead);
    assert_eq!(dead.status_code, Some(404));
}

#[tokio::test]
async fn test_other_head_statuses_are_final() {
    let server = MockServer::start().await;
    respond(&server, "HEAD", "/broken", 500).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = checker().probe(&format!("{}/broken", server.uri())).await;

    assert_eq!(result.status, LinkStatus::Dead);
    assert_eq!(result.status_code, Some(500));
}

#[tokio::test]
async fn test_restricted_access_is_alive() {
    let server = MockServer::start().await;
    respond(&server, "HEAD", "/private", 403).await;
    respond(&server, "HEAD", "/login", 401).await;

    let private = checker().probe(&format!("{}/private", server.uri())).await;
    assert_eq!(private.status, LinkStatus::Alive);
    assert_eq!(private.status_code, Some(403));

    let login = checker().probe(&format!("{}/login", server.uri())).await;
    assert_eq!(login.status, LinkStatus::Alive);
    assert_eq!(login.status_code, Some(401));
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let server = MockServer::start().await;
    Mock::given(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&server)
        .await;
    Mock::given(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = checker().probe(&format!("{}/old", server.uri())).await;

    assert_eq!(result.status, LinkStatus::Alive);
    assert_eq!(result.status_code, Some(200));
}

#[tokio::test]
async fn test_timeout_is_error() {
    let server = MockServer::start().await;
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = FetcherConfig {
        request_timeout_ms: 200,
        ..FetcherConfig::default()
    };
    let result = LinkChecker::new(&config)
        .unwrap()
        .probe(&format!("{}/slow", server.uri()))
        .await;

    assert_eq!(result.status, LinkStatus::Error);
    assert_eq!(result.status_code, None);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn test_check_links_keeps_input_order() {
    let server = MockServer::start().await;
    respond(&server, "HEAD", "/a", 200).await;
    respond(&server, "HEAD", "/b", 404).await;
    respond(&server, "HEAD", "/c", 200).await;
    respond(&server, "HEAD", "/d", 410).await;
    respond(&server, "HEAD", "/e", 302).await;

    let urls: Vec<String> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|p| format!("{}/{}", server.uri(), p))
        .collect();
    let options = JobOptions {
        link_check_concurrency: 2,
        ..fast_options()
    };

    let results = checker().check_links(&urls, &options).await;

    let returned: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(returned, urls.iter().map(String::as_str).collect::<Vec<_>>());

    let statuses: Vec<LinkStatus> = results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            LinkStatus::Alive,
            LinkStatus::Dead,
            LinkStatus::Alive,
            LinkStatus::Dead,
            LinkStatus::Alive
        ]
    );
}

#[tokio::test]
async fn test_batches_run_concurrently_and_in_sequence() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let urls: Vec<String> = (0..4).map(|i| format!("{}/p{}", server.uri(), i)).collect();
    let options = JobOptions {
        link_check_concurrency: 2,
        ..fast_options()
    };

    let started = std::time::Instant::now();
    let results = checker().check_links(&urls, &options).await;
    let elapsed = started.elapsed();

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.status == LinkStatus::Alive));
    // Two batches of two: the second starts only after the first finishes
    assert!(elapsed >= Duration::from_millis(600), "{:?}", elapsed);
    // Links within a batch are probed together, not one after another
    assert!(elapsed < Duration::from_millis(1100), "{:?}", elapsed);
}

#[tokio::test]
async fn test_batch_delay_applies_between_batches() {
    let server = MockServer::start().await;
    respond(&server, "HEAD", "/x", 200).await;

    let urls: Vec<String> = (0..3).map(|_| format!("{}/x", server.uri())).collect();
    let options = JobOptions {
        link_check_concurrency: 1,
        link_batch_delay_ms: 100,
        link_batch_jitter_ms: 0,
        ..fast_options()
    };

    let started = std::time::Instant::now();
    let results = checker().check_links(&urls, &options).await;

    assert_eq!(results.len(), 3);
    // Two gaps between three single-link batches
    assert!(started.elapsed() >= Duration::from_millis(200));
}
