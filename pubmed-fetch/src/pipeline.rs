//! The full search-convert-resolve-persist-download flow

use std::fs;
use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::client::PubMedClient;
use crate::common::PmcId;
use crate::config::{ClientConfig, DownloadConfig};
use crate::download::{DownloadOrchestrator, DownloadOutcome, SessionProvider};
use crate::error::Result;
use crate::model::{IdMap, PaperRecord};
use crate::persist::persist_results;

/// What a completed run produced
#[derive(Debug)]
pub struct RunReport {
    pub search_term: String,
    pub bundle_path: PathBuf,
    pub total_papers: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub outcomes: Vec<DownloadOutcome>,
}

/// Ties the clients, persister and orchestrator into one run.
///
/// Error policy per stage: search and summary failures degrade the run
/// (empty results, placeholder records); conversion failures degrade the
/// item; persistence failures abort.
pub struct Fetcher {
    client: PubMedClient,
    download: DownloadConfig,
}

impl Fetcher {
    pub fn new(client_config: ClientConfig, download_config: DownloadConfig) -> Self {
        Self {
            client: PubMedClient::with_config(client_config),
            download: download_config,
        }
    }

    /// Run the whole pipeline for one query.
    ///
    /// The results bundle is persisted even for a zero-hit search. Exactly
    /// one conversion request is made per search hit; hits without a PMC
    /// version are dropped before the summary and download stages.
    #[instrument(skip(self, provider), fields(term = %term, max_results = max_results))]
    pub async fn run<P: SessionProvider>(
        &self,
        term: &str,
        max_results: usize,
        provider: &P,
    ) -> Result<RunReport> {
        fs::create_dir_all(&self.download.download_dir)?;

        info!("Searching PubMed");
        let pmids = match self.client.search_pmids(term, max_results).await {
            Ok(pmids) => pmids,
            Err(error) => {
                warn!(%error, "Search failed, continuing with no results");
                Vec::new()
            }
        };

        if pmids.is_empty() {
            info!("No articles found");
        } else {
            info!(found = pmids.len(), "Converting PMIDs to PMC IDs");
        }

        let mut id_map = IdMap::new();
        for pmid in &pmids {
            match self.client.convert_pmid(pmid).await {
                Ok(Some(pmcid)) => {
                    info!(%pmid, %pmcid, "Converted");
                    id_map.insert(*pmid, pmcid);
                }
                Ok(None) => info!(%pmid, "No PMC version"),
                Err(error) => warn!(%pmid, %error, "Conversion failed, treating as unavailable"),
            }
        }

        let pmcids: Vec<_> = id_map.targets().copied().collect();
        let papers = self.resolve_papers(&pmcids, &id_map).await;

        let bundle_path = persist_results(&papers, term, &self.download.download_dir)?;

        let orchestrator = DownloadOrchestrator::new(self.download.clone());
        let report = orchestrator.download_all(&papers, provider).await;

        info!(
            term,
            total = papers.len(),
            attempted = report.attempted(),
            succeeded = report.succeeded(),
            download_dir = %self.download.download_dir.display(),
            "Run complete"
        );

        Ok(RunReport {
            search_term: term.to_string(),
            bundle_path,
            total_papers: papers.len(),
            attempted: report.attempted(),
            succeeded: report.succeeded(),
            outcomes: report.outcomes,
        })
    }

    /// Resolve metadata, degrading to placeholder records if the summary
    /// request fails outright. No request is made for an empty batch.
    async fn resolve_papers(&self, pmcids: &[PmcId], id_map: &IdMap) -> Vec<PaperRecord> {
        if pmcids.is_empty() {
            return Vec::new();
        }

        match self.client.fetch_paper_details(pmcids, id_map).await {
            Ok(papers) => papers,
            Err(error) => {
                warn!(%error, "Summary request failed, using placeholder records");
                pmcids.iter().map(PaperRecord::degraded).collect()
            }
        }
    }
}
