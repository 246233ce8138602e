//! ESummary integration tests against a mock NCBI server

mod common;

use common::{esummary_body, test_client_config, SummaryDoc};
use pubmed_fetch::{FetchError, IdMap, PaperRecord, PmcId, Pmid, PubMedClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn id_map(pairs: &[(&str, &str)]) -> IdMap {
    let mut map = IdMap::new();
    for (pmid, pmcid) in pairs {
        map.insert(Pmid::parse(pmid).unwrap(), PmcId::parse(pmcid).unwrap());
    }
    map
}

fn pmcids(ids: &[&str]) -> Vec<PmcId> {
    ids.iter().map(|id| PmcId::parse(id).unwrap()).collect()
}

#[tokio::test]
async fn test_summary_resolves_titles_dois_and_pmids() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .and(query_param("db", "pmc"))
        .and(query_param("id", "7092803,3500000"))
        .and(query_param("retmode", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esummary_body(&[
            SummaryDoc {
                uid: "7092803",
                title: Some("A Novel Coronavirus from Patients with Pneumonia in China, 2019."),
                doi: Some("10.1056/NEJMoa2001017"),
            },
            SummaryDoc {
                uid: "3500000",
                title: Some("Sepsis management in the ICU."),
                doi: None,
            },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let map = id_map(&[("31978945", "PMC7092803"), ("22222222", "PMC3500000")]);
    let client = PubMedClient::with_config(test_client_config(&server.uri()));
    let papers = client
        .fetch_paper_details(&pmcids(&["PMC7092803", "PMC3500000"]), &map)
        .await
        .unwrap();

    assert_eq!(papers.len(), 2);
    assert_eq!(papers[0].pmcid, "PMC7092803");
    assert_eq!(papers[0].pmid, "31978945");
    assert_eq!(papers[0].doi, "10.1056/NEJMoa2001017");
    assert_eq!(papers[1].pmcid, "PMC3500000");
    assert_eq!(papers[1].pmid, "22222222");
    assert_eq!(papers[1].doi, PaperRecord::UNKNOWN_DOI);
}

#[tokio::test]
async fn test_summary_unmapped_pmcid_gets_pmid_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esummary_body(&[SummaryDoc {
            uid: "99",
            title: None,
            doi: None,
        }])))
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(test_client_config(&server.uri()));
    let papers = client
        .fetch_paper_details(&pmcids(&["PMC99"]), &IdMap::new())
        .await
        .unwrap();

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0].pmid, PaperRecord::UNKNOWN_PMID);
    assert_eq!(papers[0].title, PaperRecord::UNKNOWN_TITLE);
    assert_eq!(papers[0].doi, PaperRecord::UNKNOWN_DOI);
}

#[tokio::test]
async fn test_summary_empty_input_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(test_client_config(&server.uri()));
    let papers = client
        .fetch_paper_details(&[], &IdMap::new())
        .await
        .unwrap();
    assert!(papers.is_empty());
}

#[tokio::test]
async fn test_summary_request_failure_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(test_client_config(&server.uri()));
    let err = client
        .fetch_paper_details(&pmcids(&["PMC1"]), &IdMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::ApiError { status: 502, .. }));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_summary_order_follows_response_uids() {
    let server = MockServer::start().await;

    // Response order deliberately differs from the request order.
    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esummary_body(&[
            SummaryDoc {
                uid: "20",
                title: Some("Second requested, first returned"),
                doi: None,
            },
            SummaryDoc {
                uid: "10",
                title: Some("First requested, second returned"),
                doi: None,
            },
        ])))
        .mount(&server)
        .await;

    let client = PubMedClient::with_config(test_client_config(&server.uri()));
    let papers = client
        .fetch_paper_details(&pmcids(&["PMC10", "PMC20"]), &IdMap::new())
        .await
        .unwrap();

    assert_eq!(papers[0].pmcid, "PMC20");
    assert_eq!(papers[1].pmcid, "PMC10");
}
