//! ID Converter integration tests against a mock NCBI server

mod common;

use common::{idconv_found, idconv_missing, test_client_config};
use pubmed_fetch::{FetchError, Pmid, PubMedClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_convert_returns_pmcid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/idconv/v1.0/"))
        .and(query_param("ids", "31978945"))
        .and(query_param("format", "json"))
        .and(query_param("tool", "test-fetch"))
        .and(query_param("email", "tests@example.com"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(idconv_found("31978945", "PMC7092803")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(test_client_config(&server.uri()));
    let pmid = Pmid::parse("31978945").unwrap();
    let pmcid = client.convert_pmid(&pmid).await.unwrap();

    assert_eq!(pmcid.unwrap().to_string(), "PMC7092803");
}

#[tokio::test]
async fn test_convert_no_pmc_version_is_absent_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/idconv/v1.0/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(idconv_missing("11111111")))
        .expect(1)
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(test_client_config(&server.uri()));
    let pmid = Pmid::parse("11111111").unwrap();
    assert!(client.convert_pmid(&pmid).await.unwrap().is_none());
}

#[tokio::test]
async fn test_convert_empty_records_is_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/idconv/v1.0/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"status":"ok","records":[]}"#),
        )
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(test_client_config(&server.uri()));
    let pmid = Pmid::parse("22222222").unwrap();
    assert!(client.convert_pmid(&pmid).await.unwrap().is_none());
}

#[tokio::test]
async fn test_convert_server_error_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/idconv/v1.0/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(test_client_config(&server.uri()));
    let pmid = Pmid::parse("33333333").unwrap();
    let err = client.convert_pmid(&pmid).await.unwrap_err();
    assert!(matches!(err, FetchError::ApiError { status: 500, .. }));
}

#[tokio::test]
async fn test_convert_one_request_per_pmid() {
    let server = MockServer::start().await;

    for pmid in ["101", "102", "103"] {
        Mock::given(method("GET"))
            .and(path("/idconv/v1.0/"))
            .and(query_param("ids", pmid))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(idconv_found(pmid, &format!("PMC{pmid}"))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = PubMedClient::with_config(test_client_config(&server.uri()));
    for pmid in ["101", "102", "103"] {
        let parsed = Pmid::parse(pmid).unwrap();
        let pmcid = client.convert_pmid(&parsed).await.unwrap().unwrap();
        assert_eq!(pmcid.to_string(), format!("PMC{pmid}"));
    }
    // MockServer verifies the one-request-per-PMID expectations on drop.
}
