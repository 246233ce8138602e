//! Download orchestrator tests with a scripted browser session

mod common;

use common::{test_download_config, FakeProvider, PageBehavior};
use pubmed_fetch::{
    DownloadMethod, DownloadOrchestrator, DownloadStage, FetchError, PaperRecord, PmcId,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(pmcid: &str) -> PaperRecord {
    PaperRecord::degraded(&PmcId::parse(pmcid).unwrap())
}

#[tokio::test]
async fn test_browser_download_renames_to_canonical_name() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FakeProvider::new(dir.path());
    let orchestrator = DownloadOrchestrator::new(test_download_config(dir.path()));

    let outcome = orchestrator.download_one(&record("PMC7092803"), &provider).await;

    assert!(outcome.success);
    assert_eq!(outcome.stage, DownloadStage::Renamed);
    assert!(dir.path().join("PMC7092803.pdf").exists());
    assert!(!dir.path().join("PMC7092803_article.pdf").exists());
    assert_eq!(provider.sessions_opened(), 1);
    assert_eq!(provider.sessions_closed(), 1);
}

#[tokio::test]
async fn test_missing_link_fails_but_releases_session() {
    let dir = tempfile::tempdir().unwrap();
    let provider =
        FakeProvider::new(dir.path()).with_behavior("PMC11", PageBehavior::MissingLink);
    let orchestrator = DownloadOrchestrator::new(test_download_config(dir.path()));

    let outcome = orchestrator.download_one(&record("PMC11"), &provider).await;

    assert!(!outcome.success);
    assert_eq!(outcome.stage, DownloadStage::SessionOpened);
    assert!(matches!(
        outcome.error,
        Some(FetchError::PdfLinkMissing { .. })
    ));
    assert_eq!(provider.sessions_closed(), 1);
}

#[tokio::test]
async fn test_existing_canonical_file_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("PMC5.pdf"), b"original contents").unwrap();

    let provider = FakeProvider::new(dir.path());
    let orchestrator = DownloadOrchestrator::new(test_download_config(dir.path()));

    let outcome = orchestrator.download_one(&record("PMC5"), &provider).await;

    assert!(outcome.success);
    assert_eq!(
        std::fs::read(dir.path().join("PMC5.pdf")).unwrap(),
        b"original contents"
    );
}

#[tokio::test]
async fn test_batch_continues_past_failures_with_pacing() {
    let dir = tempfile::tempdir().unwrap();
    let provider =
        FakeProvider::new(dir.path()).with_behavior("PMC2", PageBehavior::MissingLink);
    let orchestrator = DownloadOrchestrator::new(test_download_config(dir.path()));

    let papers = vec![record("PMC1"), record("PMC2"), record("PMC3")];
    let report = orchestrator.download_all(&papers, &provider).await;

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.succeeded(), 2);
    assert!(report.outcomes[0].success);
    assert!(!report.outcomes[1].success);
    assert!(report.outcomes[2].success);
    assert!(dir.path().join("PMC1.pdf").exists());
    assert!(dir.path().join("PMC3.pdf").exists());
    // One session per record, all released.
    assert_eq!(provider.sessions_opened(), 3);
    assert_eq!(provider.sessions_closed(), 3);
}

#[tokio::test]
async fn test_http_method_streams_located_href() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;

    // The fake session reports href "pdf/PMC77.pdf" relative to the article
    // page, which lives under the mock server for this test.
    Mock::given(method("GET"))
        .and(path("/articles/PMC77/pdf/PMC77.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 streamed".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_download_config(dir.path())
        .with_article_base_url(format!("{}/articles", server.uri()))
        .with_method(DownloadMethod::Http);
    let provider = FakeProvider::new(dir.path());
    let orchestrator = DownloadOrchestrator::new(config);

    let outcome = orchestrator.download_one(&record("PMC77"), &provider).await;

    assert!(outcome.success);
    assert_eq!(
        std::fs::read(dir.path().join("PMC77.pdf")).unwrap(),
        b"%PDF-1.4 streamed"
    );
}

#[tokio::test]
async fn test_http_method_skips_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("PMC8.pdf"), b"already here").unwrap();

    let config = test_download_config(dir.path())
        .with_article_base_url("http://127.0.0.1:1/articles")
        .with_method(DownloadMethod::Http);
    let provider = FakeProvider::new(dir.path());
    let orchestrator = DownloadOrchestrator::new(config);

    // No HTTP server is reachable; the short-circuit must win before any
    // request is attempted.
    let outcome = orchestrator.download_one(&record("PMC8"), &provider).await;

    assert!(outcome.success);
    assert_eq!(
        std::fs::read(dir.path().join("PMC8.pdf")).unwrap(),
        b"already here"
    );
}
