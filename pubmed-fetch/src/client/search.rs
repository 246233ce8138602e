//! ESearch operation: free-full-text PubMed search

use tracing::{debug, info, instrument, warn};

use super::responses::ESearchResponse;
use super::PubMedClient;
use crate::common::Pmid;
use crate::error::{FetchError, Result};

/// Filter clause appended to every query so that only articles with a free
/// full-text version are returned.
const FREE_FULL_TEXT_FILTER: &str = " AND \"free full text\"[Filter]";

impl PubMedClient {
    /// Search PubMed for articles matching `term`, capped at `max_results`.
    ///
    /// The free-full-text filter clause is appended to the term and results
    /// are requested sorted by relevance. An empty or whitespace-only term
    /// and a zero-hit search both return an empty list, not an error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_fetch::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let pmids = client.search_pmids("sepsis treatment", 5).await?;
    ///     for pmid in &pmids {
    ///         println!("{pmid}");
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(term = %term, max_results = max_results))]
    pub async fn search_pmids(&self, term: &str, max_results: usize) -> Result<Vec<Pmid>> {
        if term.trim().is_empty() {
            debug!("Empty search term, returning no results");
            return Ok(Vec::new());
        }

        let full_term = format!("{}{}", term.trim(), FREE_FULL_TEXT_FILTER);
        let url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=json&sort=relevance",
            self.config().eutils_base_url,
            urlencoding::encode(&full_term),
            max_results,
        );

        let response = self.make_request(&url).await?;
        let search_result: ESearchResponse = response.json().await?;

        if let Some(error_msg) = &search_result.esearchresult.error {
            return Err(FetchError::ApiError {
                status: 200,
                message: format!("NCBI ESearch error: {error_msg}"),
            });
        }

        let mut pmids = Vec::with_capacity(search_result.esearchresult.idlist.len());
        for id in &search_result.esearchresult.idlist {
            match Pmid::parse(id) {
                Ok(pmid) => pmids.push(pmid),
                Err(_) => warn!(id, "Skipping malformed PMID in ESearch response"),
            }
        }

        info!(found = pmids.len(), "ESearch completed");
        Ok(pmids)
    }
}
