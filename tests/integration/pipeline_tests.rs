//! End-to-end tests: crawl a mock site, classify through a mock model API

use rpa_scout::classifier::{NeverCancel, OpenAiClient, ProbeFn, RunOutcome, StopPoint};
use rpa_scout::config::Config;
use rpa_scout::output::{format_markdown_report, JsonExport, ReportWriter};
use rpa_scout::{Pipeline, ScanRequest, StructuredResult};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a small company site: home, invoices, about, careers
async fn mount_site(server: &MockServer) {
    let pages = [
        (
            "/",
            r#"<html><body><h1>Acme Ltd</h1><a href="/invoices">Invoices</a><a href="/about">About</a><a href="/careers">Careers</a><a href="https://twitter.com/acme">Twitter</a></body></html>"#,
        ),
        (
            "/invoices",
            "<html><body><h1>Supplier invoices</h1><p>Email PDF invoices to AP for manual entry.</p></body></html>",
        ),
        (
            "/about",
            "<html><body><h1>About us</h1><p>Founded in 1990.</p></body></html>",
        ),
        (
            "/careers",
            "<html><body><h1>Careers</h1><p>Download the form, fill it in and post it to HR.</p></body></html>",
        ),
    ];

    for (route, body) in pages {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
            .mount(server)
            .await;
    }
}

/// Mounts a model endpoint that always returns `content`
async fn mount_model(server: &MockServer, content: String) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })))
        .mount(server)
        .await;
}

fn test_config(batch_size: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = 1;
    config.classifier.batch_size = batch_size;
    config
}

fn pipeline(config: Config, model_server: &MockServer) -> Pipeline<OpenAiClient> {
    let client = OpenAiClient::new("test-key").with_base_url(model_server.uri());
    Pipeline::new(config, "test-hash".to_string(), client).expect("Failed to build pipeline")
}

fn reply_for(site: &str) -> String {
    format!(
        r#"Here is my analysis:
```json
[
  {{"url": "{site}/invoices", "summary": "Supplier invoice intake", "rpa_opportunity": "Extract invoice data from PDFs into the ERP"}},
  {{"url": "{site}/about", "summary": "Company history", "rpa_opportunity": "No RPA applicable"}},
  {{"url": "{site}/careers", "summary": "Paper job applications", "rpa_opportunity": "Digitize and route job applications"}}
]
```"#,
        site = site
    )
}

#[tokio::test]
async fn test_full_scan_finds_opportunities() {
    let site = MockServer::start().await;
    let model = MockServer::start().await;
    mount_site(&site).await;
    mount_model(&model, reply_for(&site.uri())).await;

    let config = test_config(8);
    let request = ScanRequest::from_config(site.uri(), &config);
    let report = pipeline(config, &model)
        .run(&request, &NeverCancel)
        .await
        .unwrap();

    assert_eq!(report.seed_url, format!("{}/", site.uri()));
    assert_eq!(report.pages_discovered(), 4);
    assert_eq!(report.config_hash, "test-hash");
    assert_eq!(report.classification.outcome, RunOutcome::Completed);
    assert_eq!(report.classification.stats.total, 1);
    assert_eq!(report.classification.stats.rejected_items, 1);

    let urls: Vec<&str> = report
        .classification
        .results
        .iter()
        .map(|r| r.url.as_str())
        .collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/invoices", site.uri()),
            format!("{}/careers", site.uri())
        ]
    );

    let markdown = format_markdown_report(&report);
    assert!(markdown.contains("Extract invoice data from PDFs into the ERP"));
    assert!(!markdown.contains("No RPA applicable"));
}

#[tokio::test]
async fn test_prompt_carries_previews_of_crawled_pages() {
    let site = MockServer::start().await;
    let model = MockServer::start().await;
    mount_site(&site).await;
    mount_model(&model, "[]".to_string()).await;

    let config = test_config(8);
    let request = ScanRequest::from_config(site.uri(), &config)
        .with_prompt(Some("List automatable workflows.".to_string()));
    pipeline(config, &model)
        .run(&request, &NeverCancel)
        .await
        .unwrap();

    let received = model.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    let prompt = body["messages"][0]["content"].as_str().unwrap();

    assert!(prompt.starts_with("List automatable workflows.\n\nURL: "));
    assert!(prompt.contains(&format!(
        "URL: {}/invoices\nPreview: Supplier invoices Email PDF invoices to AP for manual entry.",
        site.uri()
    )));
    assert!(prompt.contains("\n\n---\n\n"));
    assert!(!prompt.contains("twitter.com"));
}

#[tokio::test]
async fn test_cancel_between_batches_keeps_partial_results() {
    let site = MockServer::start().await;
    let model = MockServer::start().await;
    mount_site(&site).await;
    mount_model(&model, reply_for(&site.uri())).await;

    // Probes: before crawl, before classify, before batch 1, after batch 1
    let counter = Arc::new(AtomicUsize::new(0));
    let cancel = ProbeFn(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move { n >= 4 }
    });

    let config = test_config(2);
    let request = ScanRequest::from_config(site.uri(), &config);
    let report = pipeline(config, &model).run(&request, &cancel).await.unwrap();

    assert_eq!(
        report.classification.outcome,
        RunOutcome::StoppedEarly(StopPoint::AfterBatch(1))
    );
    assert_eq!(report.classification.stats.total, 2);
    assert_eq!(model.received_requests().await.unwrap().len(), 1);

    // Only batch one's reply was read; it names pages from the whole run
    let urls: Vec<&str> = report
        .classification
        .results
        .iter()
        .map(|r| r.url.as_str())
        .collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/invoices", site.uri()),
            format!("{}/careers", site.uri())
        ]
    );
}

#[tokio::test]
async fn test_model_outage_yields_empty_results() {
    let site = MockServer::start().await;
    let model = MockServer::start().await;
    mount_site(&site).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&model)
        .await;

    let config = test_config(2);
    let request = ScanRequest::from_config(site.uri(), &config);
    let report = pipeline(config, &model)
        .run(&request, &NeverCancel)
        .await
        .unwrap();

    assert!(report.classification.results.is_empty());
    assert_eq!(report.classification.stats.service_failures, 2);
    assert!(report.classification.outcome.is_completed());
}

#[tokio::test]
async fn test_json_export_of_scan() {
    let site = MockServer::start().await;
    let model = MockServer::start().await;
    mount_site(&site).await;
    mount_model(&model, reply_for(&site.uri())).await;

    let config = test_config(8);
    let request = ScanRequest::from_config(site.uri(), &config);
    let report = pipeline(config, &model)
        .run(&request, &NeverCancel)
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("results.json");
    JsonExport::new(&json_path).write_report(&report).unwrap();

    let exported: Vec<StructuredResult> =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(exported, report.classification.results);
}

#[tokio::test]
async fn test_invalid_seed_is_rejected_before_any_request() {
    let model = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&model)
        .await;

    let config = test_config(8);
    let request = ScanRequest::from_config("not a url", &config);
    let result = pipeline(config, &model).run(&request, &NeverCancel).await;

    assert!(result.is_err());
}
