//! Full jobs against mock sites

use crate::common::{fast_options, html_page, RecordingStore};
use link_sonar::config::{Config, FetcherConfig};
use link_sonar::crawler::{HttpRenderer, PageCrawler};
use link_sonar::job::{
    DiscoveryMethod, Job, JobOptions, JobOrchestrator, JobRequest, JobStatus, LinkStatus,
    PartialJobOptions,
};
use link_sonar::storage::{JobStore, MemoryJobStore, SqliteJobStore};
use std::sync::Arc;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator(store: Arc<dyn JobStore>) -> Arc<JobOrchestrator> {
    let renderer = Arc::new(HttpRenderer::new(&FetcherConfig::default()).unwrap());
    Arc::new(JobOrchestrator::new(&Config::default(), renderer, store).unwrap())
}

async fn serve_html(server: &MockServer, route: &str, body: String) {
    Mock::given(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

async fn respond(server: &MockServer, verb: &str, route: &str, status: u16) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// External site whose links the target points at
async fn external_site() -> MockServer {
    let server = MockServer::start().await;
    respond(&server, "HEAD", "/ok", 200).await;
    respond(&server, "HEAD", "/gone", 404).await;
    respond(&server, "HEAD", "/members", 403).await;
    respond(&server, "HEAD", "/no-head", 405).await;
    respond(&server, "GET", "/no-head", 200).await;
    respond(&server, "HEAD", "/from-about", 200).await;
    respond(&server, "HEAD", "/from-post", 200).await;
    server
}

fn job_for(server: &MockServer, options: JobOptions) -> Job {
    Job::new(format!("{}/", server.uri()), options)
}

#[tokio::test]
async fn test_scrape_job_crawls_and_checks() {
    let site = MockServer::start().await;
    let external = external_site().await;
    let ext = external.uri();

    serve_html(
        &site,
        "/",
        html_page(
            "Home",
            &format!(
                r#"<a href="/about">About</a>
                   <a href="{ext}/ok">ok</a>
                   <a href="{ext}/gone">gone</a>
                   <a href="{ext}/members">members</a>
                   <a href="{ext}/no-head">no head</a>
                   <a href="mailto:team@example.com">mail</a>"#
            ),
        ),
    )
    .await;
    serve_html(
        &site,
        "/about",
        html_page("About", &format!(r#"<a href="{ext}/from-about">x</a>"#)),
    )
    .await;

    let store = Arc::new(RecordingStore::default());
    let orchestrator = orchestrator(store.clone());
    let job = job_for(&site, fast_options());
    store.insert(&job).unwrap();

    let finished = orchestrator.run(job).await;

    assert_eq!(finished.status, JobStatus::Completed, "{:?}", finished.error);
    let result = finished.result.clone().unwrap();
    assert_eq!(result.title.as_deref(), Some("Home"));
    assert_eq!(result.discovery_method, DiscoveryMethod::Scrape);
    assert_eq!(
        result.crawled_pages,
        vec![format!("{}/", site.uri()), format!("{}/about", site.uri())]
    );
    assert_eq!(result.pages_crawled, 2);

    let checked: Vec<&str> = result.links.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(
        checked,
        vec![
            format!("{}/about", site.uri()).as_str(),
            format!("{ext}/ok").as_str(),
            format!("{ext}/gone").as_str(),
            format!("{ext}/members").as_str(),
            format!("{ext}/no-head").as_str(),
            format!("{ext}/from-about").as_str(),
        ]
    );

    assert_eq!(result.links_checked, 6);
    assert_eq!(result.alive, 5);
    assert_eq!(result.dead, 1);
    assert_eq!(result.errors, 0);
    assert_eq!(
        result.alive + result.dead + result.errors,
        result.links.len()
    );

    let gone = result
        .links
        .iter()
        .find(|l| l.url.ends_with("/gone"))
        .unwrap();
    assert_eq!(gone.status, LinkStatus::Dead);
    assert_eq!(gone.status_code, Some(404));

    assert_eq!(store.events(), vec!["insert", "processing", "completed"]);
    let stored = store.get(finished.id).unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.result, finished.result);
}

#[tokio::test]
async fn test_sitemap_job_seeds_internal_pages() {
    let site = MockServer::start().await;
    let external = external_site().await;
    let base = site.uri();
    let ext = external.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("User-agent: *\nSitemap: {base}/map.xml\n")),
        )
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/map.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<urlset><url><loc>{base}/post-1</loc></url><url><loc>{ext}/elsewhere</loc></url></urlset>"#
        )))
        .mount(&site)
        .await;

    serve_html(
        &site,
        "/",
        html_page("Blog", &format!(r#"<a href="{ext}/ok">ok</a>"#)),
    )
    .await;
    serve_html(
        &site,
        "/post-1",
        html_page("Post", &format!(r#"<a href="{ext}/from-post">x</a>"#)),
    )
    .await;

    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let orchestrator = orchestrator(store.clone());
    let job = job_for(&site, fast_options());
    store.insert(&job).unwrap();

    let finished = orchestrator.run(job).await;
    let result = finished.result.unwrap();

    assert_eq!(result.discovery_method, DiscoveryMethod::Sitemap);
    assert_eq!(
        result.crawled_pages,
        vec![format!("{base}/"), format!("{base}/post-1")]
    );
    let checked: Vec<&str> = result.links.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(
        checked,
        vec![format!("{ext}/ok").as_str(), format!("{ext}/from-post").as_str()]
    );
    assert_eq!(result.alive, 2);
}

#[tokio::test]
async fn test_no_follow_visits_root_only() {
    let site = MockServer::start().await;
    let external = external_site().await;
    let ext = external.uri();

    serve_html(
        &site,
        "/",
        html_page(
            "Home",
            &format!(r#"<a href="/about">About</a><a href="{ext}/ok">ok</a>"#),
        ),
    )
    .await;
    serve_html(&site, "/about", html_page("About", "")).await;

    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let orchestrator = orchestrator(store.clone());
    let job = job_for(
        &site,
        JobOptions {
            follow_internal_links: false,
            ..fast_options()
        },
    );
    store.insert(&job).unwrap();

    let result = orchestrator.run(job).await.result.unwrap();

    assert_eq!(result.crawled_pages, vec![format!("{}/", site.uri())]);
    assert_eq!(result.links_checked, 2);
}

#[tokio::test]
async fn test_link_cap_drops_excess_links() {
    let site = MockServer::start().await;
    let external = external_site().await;
    let ext = external.uri();

    serve_html(
        &site,
        "/",
        html_page(
            "Home",
            &format!(
                r#"<a href="{ext}/ok">1</a><a href="{ext}/gone">2</a><a href="{ext}/members">3</a>"#
            ),
        ),
    )
    .await;

    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let orchestrator = orchestrator(store.clone());
    let job = job_for(
        &site,
        JobOptions {
            max_links_to_check: 2,
            ..fast_options()
        },
    );
    store.insert(&job).unwrap();

    let result = orchestrator.run(job).await.result.unwrap();

    assert_eq!(result.links_checked, 2);
    assert_eq!(result.links[0].url, format!("{ext}/ok"));
    assert_eq!(result.links[1].url, format!("{ext}/gone"));
}

#[tokio::test]
async fn test_unreachable_root_fails_with_one_terminal_callback() {
    let store = Arc::new(RecordingStore::default());
    let orchestrator = orchestrator(store.clone());
    let job = Job::new("http://127.0.0.1:1/", fast_options());
    store.insert(&job).unwrap();

    let finished = orchestrator.run(job).await;

    assert_eq!(finished.status, JobStatus::Failed);
    assert!(finished.result.is_none());
    assert!(finished
        .error
        .as_deref()
        .unwrap()
        .contains("http://127.0.0.1:1/"));
    assert!(finished.completed_at.is_some());
    assert_eq!(store.events(), vec!["insert", "processing", "failed"]);
}

#[tokio::test]
async fn test_submit_returns_pending_and_persists_to_sqlite() {
    let dir = TempDir::new().unwrap();
    let site = MockServer::start().await;
    serve_html(&site, "/", html_page("Empty", "<p>no links</p>")).await;

    let store: Arc<dyn JobStore> =
        Arc::new(SqliteJobStore::new(&dir.path().join("jobs.db")).unwrap());
    let orchestrator = orchestrator(store.clone());

    let request = JobRequest::new(format!("{}/", site.uri())).with_options(PartialJobOptions {
        link_batch_delay_ms: Some(0),
        navigation_delay_ms: Some(0),
        ..Default::default()
    });
    let submitted = orchestrator.submit(request).unwrap();

    assert_eq!(submitted.job.status, JobStatus::Pending);
    assert_eq!(submitted.job.options.link_batch_delay_ms, 0);
    assert_eq!(submitted.job.options.max_internal_pages, 10);

    let finished = submitted.handle.await.unwrap();
    assert_eq!(finished.status, JobStatus::Completed);

    let stored = store.get(finished.id).unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    let result = stored.result.unwrap();
    assert_eq!(result.title.as_deref(), Some("Empty"));
    assert_eq!(result.links_checked, 0);
}

#[tokio::test]
async fn test_internal_navigation_failure_is_skipped() {
    let site = MockServer::start().await;
    let base = site.uri();

    serve_html(
        &site,
        "/",
        html_page(
            "Home",
            r#"<a href="/slow">slow</a><a href="/fine">fine</a>"#,
        ),
    )
    .await;
    Mock::given(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&site)
        .await;
    serve_html(&site, "/fine", html_page("Fine", "")).await;

    let renderer = Arc::new(
        HttpRenderer::new(&FetcherConfig {
            navigation_timeout_ms: 300,
            ..FetcherConfig::default()
        })
        .unwrap(),
    );
    let crawler = PageCrawler::new(renderer);
    let root = Url::parse(&format!("{base}/")).unwrap();

    let outcome = crawler.crawl(&root, &fast_options(), &[]).await.unwrap();

    assert_eq!(
        outcome.pages_crawled,
        vec![format!("{base}/"), format!("{base}/fine")]
    );
}
