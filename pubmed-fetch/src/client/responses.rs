//! Wire types for the three NCBI endpoints this crate consumes
//!
//! All three speak JSON (`retmode=json` / `format=json`).

use serde::Deserialize;

/// ESearch response envelope
#[derive(Debug, Deserialize)]
pub struct ESearchResponse {
    pub esearchresult: ESearchResult,
}

#[derive(Debug, Deserialize)]
pub struct ESearchResult {
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub idlist: Vec<String>,
    /// NCBI sometimes returns 200 OK with an ERROR field instead of a status code
    #[serde(rename = "ERROR", default)]
    pub error: Option<String>,
}

/// ID Converter response (`/pmc/utils/idconv/v1.0/?format=json`)
#[derive(Debug, Deserialize)]
pub struct IdConvResponse {
    #[serde(default)]
    pub records: Vec<IdConvRecord>,
}

/// One conversion record; `pmcid` is absent when the article has no PMC version
#[derive(Debug, Deserialize)]
pub struct IdConvRecord {
    #[serde(default)]
    pub pmid: Option<String>,
    #[serde(default)]
    pub pmcid: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
}

/// ESummary response envelope.
///
/// The `result` object maps each UID to its document summary plus a `uids`
/// array giving document order, so it is kept as a raw JSON value and walked
/// by the parser.
#[derive(Debug, Deserialize)]
pub struct ESummaryResponse {
    pub result: serde_json::Value,
}

/// One entry of a document summary's `articleids` array
#[derive(Debug, Deserialize)]
pub struct ArticleId {
    #[serde(default)]
    pub idtype: String,
    #[serde(default)]
    pub value: String,
}
