//! Integration tests for the site crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use rpa_scout::config::{Config, UserAgentConfig};
use rpa_scout::crawler::{build_http_client, SiteCrawler};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler with the default configuration
fn test_crawler() -> SiteCrawler {
    SiteCrawler::from_config(&Config::default()).expect("Failed to build crawler")
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

fn page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

#[tokio::test]
async fn test_depth_one_keeps_internal_links_only() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        page(&[
            "/about",
            &format!("{}/services", base),
            "https://elsewhere.example.org/page",
            "mailto:info@example.com",
            "javascript:void(0)",
            "#top",
        ]),
    )
    .await;

    let seed = format!("{}/", base);
    let urls = test_crawler().crawl(&seed, 1).await;

    assert_eq!(
        urls,
        vec![
            seed.clone(),
            format!("{}/about", base),
            format!("{}/services", base),
        ]
    );
}

#[tokio::test]
async fn test_depth_two_visits_in_document_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page(&["/a", "/b"])).await;
    mount_page(&server, "/a", page(&["/a/1", "/a/2"])).await;
    mount_page(&server, "/b", page(&["/b/1"])).await;

    let seed = format!("{}/", base);
    let urls = test_crawler().crawl(&seed, 2).await;

    let expected: Vec<String> = ["/", "/a", "/a/1", "/a/2", "/b", "/b/1"]
        .iter()
        .map(|p| format!("{}{}", base, p))
        .collect();
    assert_eq!(urls, expected);
}

#[tokio::test]
async fn test_pages_at_max_depth_are_not_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page(&["/leaf"])).await;

    Mock::given(method("GET"))
        .and(path("/leaf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page(&["/deeper"]), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let urls = test_crawler().crawl(&format!("{}/", base), 1).await;

    assert_eq!(urls.len(), 2);
    assert!(urls.contains(&format!("{}/leaf", base)));
    assert!(!urls.contains(&format!("{}/deeper", base)));
}

#[tokio::test]
async fn test_depth_zero_returns_seed_without_fetching() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page(&["/a"]), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let urls = test_crawler().crawl(&seed, 0).await;

    assert_eq!(urls, vec![seed]);
}

#[tokio::test]
async fn test_cycles_and_duplicates_visited_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(page(&["/a", "/a#section", "/a", "/"]), "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page(&["/", "/a"]), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let urls = test_crawler().crawl(&seed, 3).await;

    assert_eq!(urls, vec![seed, format!("{}/a", base)]);
}

#[tokio::test]
async fn test_failed_pages_are_recorded_but_not_expanded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page(&["/broken", "/missing", "/report.pdf", "/ok"])).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(page(&["/sitemap"]), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/hidden">x</a>"#, "application/pdf"),
        )
        .mount(&server)
        .await;

    mount_page(&server, "/ok", page(&["/ok/child"])).await;

    let urls = test_crawler().crawl(&format!("{}/", base), 2).await;

    assert!(urls.contains(&format!("{}/broken", base)));
    assert!(urls.contains(&format!("{}/missing", base)));
    assert!(!urls.contains(&format!("{}/sitemap", base)));
    assert!(urls.contains(&format!("{}/report.pdf", base)));
    assert!(urls.contains(&format!("{}/ok/child", base)));
    assert!(!urls.contains(&format!("{}/hidden", base)));
}

#[tokio::test]
async fn test_unreachable_seed_returns_seed_only() {
    let urls = test_crawler().crawl("http://127.0.0.1:9/", 2).await;
    assert_eq!(urls, vec!["http://127.0.0.1:9/".to_string()]);
}

#[tokio::test]
async fn test_seed_redirect_to_other_host_keeps_relative_links_on_seed_host() {
    let apex = MockServer::start().await;
    let www = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/", www.uri()).as_str()),
        )
        .mount(&apex)
        .await;

    mount_page(&www, "/", page(&["/invoices", "about"])).await;

    let seed = format!("{}/", apex.uri());
    let urls = test_crawler().crawl(&seed, 1).await;

    assert_eq!(
        urls,
        vec![
            seed.clone(),
            format!("{}/invoices", apex.uri()),
            format!("{}/about", apex.uri()),
        ]
    );
}

#[tokio::test]
async fn test_redirected_page_links_resolve_against_requested_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page(&["/old/"])).await;

    Mock::given(method("GET"))
        .and(path("/old/"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new/", base).as_str()),
        )
        .mount(&server)
        .await;

    mount_page(&server, "/new/", page(&["child"])).await;

    let urls = test_crawler().crawl(&format!("{}/", base), 2).await;

    assert!(urls.contains(&format!("{}/old/child", base)));
    assert!(!urls.contains(&format!("{}/new/child", base)));
}

#[tokio::test]
async fn test_max_pages_caps_the_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page(&["/a", "/b", "/c", "/d"])).await;

    let crawler = test_crawler().with_max_pages(Some(3));
    let urls = crawler.crawl(&format!("{}/", base), 1).await;

    assert_eq!(urls.len(), 3);
    assert_eq!(urls[1], format!("{}/a", base));
}

#[tokio::test]
async fn test_descriptive_user_agent_is_sent() {
    let server = MockServer::start().await;

    let ua = UserAgentConfig {
        crawler_name: "ScoutTest".to_string(),
        crawler_version: "2.0.0".to_string(),
        contact_url: "https://example.com/bot".to_string(),
        contact_email: "bot@example.com".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header(
            "user-agent",
            "ScoutTest/2.0.0 (+https://example.com/bot; bot@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page(&[]), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_http_client(&ua, Duration::from_secs(5)).unwrap();
    let crawler = SiteCrawler::new(client);
    crawler.crawl(&format!("{}/", server.uri()), 1).await;
}

#[tokio::test]
async fn test_independent_crawls_do_not_share_visited_state() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", page(&["/a"])).await;

    let crawler = test_crawler();
    let first = crawler.crawl(&format!("{}/", base), 1).await;
    let second = crawler.crawl(&format!("{}/", base), 1).await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}
