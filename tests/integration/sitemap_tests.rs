//! Sitemap discovery against mock sites

use link_sonar::config::{FetcherConfig, SitemapConfig};
use link_sonar::crawler::HttpFetcher;
use link_sonar::sitemap::SitemapResolver;
use std::collections::HashSet;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver(config: SitemapConfig) -> SitemapResolver {
    let fetcher = Arc::new(HttpFetcher::new(&FetcherConfig::default()).unwrap());
    SitemapResolver::new(fetcher, &config)
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn sitemap_index(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

async fn serve(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn as_set(urls: Vec<String>) -> HashSet<String> {
    urls.into_iter().collect()
}

#[tokio::test]
async fn test_robots_index_tree_is_flattened() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/robots.txt",
        format!("User-agent: *\nDisallow: /admin\nSitemap: {}/index.xml\n", base),
    )
    .await;
    serve(
        &server,
        "/index.xml",
        sitemap_index(&[
            format!("{}/posts.xml", base),
            "pages.xml".to_string(),
            format!("{}/missing.xml", base),
        ]),
    )
    .await;
    serve(
        &server,
        "/posts.xml",
        urlset(&[format!("{}/post-1", base), format!("{}/post-2", base)]),
    )
    .await;
    serve(&server, "/pages.xml", urlset(&[format!("{}/about", base)])).await;

    let urls = resolver(SitemapConfig::default())
        .discover_from_sitemap(&base)
        .await;

    assert_eq!(
        as_set(urls),
        as_set(vec![
            format!("{}/post-1", base),
            format!("{}/post-2", base),
            format!("{}/about", base),
        ])
    );
}

#[tokio::test]
async fn test_well_known_paths_without_robots() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/sitemap_index.xml",
        urlset(&[format!("{}/from-well-known", base)]),
    )
    .await;

    let urls = resolver(SitemapConfig::default())
        .discover_from_sitemap(&base)
        .await;

    assert_eq!(urls, vec![format!("{}/from-well-known", base)]);
}

#[tokio::test]
async fn test_duplicates_across_sitemaps_collapse() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/sitemap.xml",
        urlset(&[format!("{}/a", base), format!("{}/b", base)]),
    )
    .await;
    serve(
        &server,
        "/sitemap_index.xml",
        urlset(&[format!("{}/b", base), format!("{}/c", base)]),
    )
    .await;

    let urls = resolver(SitemapConfig::default())
        .discover_from_sitemap(&base)
        .await;

    assert_eq!(urls.len(), 3);
    assert_eq!(
        as_set(urls),
        as_set(vec![
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base),
        ])
    );
}

#[tokio::test]
async fn test_no_sitemaps_yields_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    serve(&server, "/sitemap_index.xml", "<html>not xml</html>".to_string()).await;

    let urls = resolver(SitemapConfig::default())
        .discover_from_sitemap(&server.uri())
        .await;

    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_cyclic_index_terminates() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/sitemap.xml", base), format!("{}/loop.xml", base)]),
    )
    .await;
    serve(
        &server,
        "/loop.xml",
        sitemap_index(&[format!("{}/sitemap.xml", base), format!("{}/leaf.xml", base)]),
    )
    .await;
    serve(&server, "/leaf.xml", urlset(&[format!("{}/leaf-page", base)])).await;

    let urls = resolver(SitemapConfig::default())
        .discover_from_sitemap(&base)
        .await;

    assert_eq!(urls, vec![format!("{}/leaf-page", base)]);
}

#[tokio::test]
async fn test_nesting_beyond_max_depth_is_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/level-1.xml", base)]),
    )
    .await;
    serve(
        &server,
        "/level-1.xml",
        sitemap_index(&[format!("{}/level-2.xml", base)]),
    )
    .await;
    serve(&server, "/level-2.xml", urlset(&[format!("{}/deep", base)])).await;

    let shallow = resolver(SitemapConfig {
        max_depth: 1,
        ..SitemapConfig::default()
    });
    assert!(shallow.discover_from_sitemap(&base).await.is_empty());

    let deep = resolver(SitemapConfig {
        max_depth: 2,
        ..SitemapConfig::default()
    });
    assert_eq!(
        deep.discover_from_sitemap(&base).await,
        vec![format!("{}/deep", base)]
    );
}

#[tokio::test]
async fn test_document_cap_limits_fetches() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/robots.txt",
        format!("Sitemap: {}/first.xml\nSitemap: {}/second.xml\n", base, base),
    )
    .await;
    serve(&server, "/first.xml", urlset(&[format!("{}/one", base)])).await;
    serve(&server, "/second.xml", urlset(&[format!("{}/two", base)])).await;

    let capped = resolver(SitemapConfig {
        max_sitemaps: 1,
        ..SitemapConfig::default()
    });

    assert_eq!(
        capped.discover_from_sitemap(&base).await,
        vec![format!("{}/one", base)]
    );
}

#[tokio::test]
async fn test_sitemap_too_deep_on_one_path_is_still_read_from_another() {
    let server = MockServer::start().await;
    let base = server.uri();

    serve(
        &server,
        "/robots.txt",
        format!("Sitemap: {base}/outer.xml\nSitemap: {base}/shared.xml\n"),
    )
    .await;
    serve(&server, "/outer.xml", sitemap_index(&[format!("{base}/inner.xml")])).await;
    serve(&server, "/inner.xml", sitemap_index(&[format!("{base}/shared.xml")])).await;
    serve(&server, "/shared.xml", urlset(&[format!("{base}/shared-page")])).await;

    // shared.xml is first reached at depth 2 through outer -> inner, then
    // listed directly in robots.txt at depth 0
    let urls = resolver(SitemapConfig {
        max_depth: 1,
        ..SitemapConfig::default()
    })
    .discover_from_sitemap(&base)
    .await;

    assert_eq!(urls, vec![format!("{base}/shared-page")]);
}
