//! Client for the NCBI endpoints the pipeline talks to
//!
//! Operations are split across focused modules:
//! - `mod.rs` - client struct, constructors, request helper
//! - `search` - ESearch (free-full-text PubMed search)
//! - `convert` - ID Converter (PMID -> PMCID)
//! - `summary` - ESummary (bibliographic metadata, db=pmc)

mod convert;
mod search;
mod summary;

pub mod responses;

use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{FetchError, Result};

/// Client for PubMed E-utilities and the ID Converter
///
/// # Example
///
/// ```no_run
/// use pubmed_fetch::{ClientConfig, PubMedClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PubMedClient::with_config(
///         ClientConfig::new().with_email("researcher@university.edu"),
///     );
///     let pmids = client.search_pmids("sepsis treatment", 5).await?;
///     println!("Found {} articles", pmids.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PubMedClient {
    http: Client,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a client with default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("{}/{}", config.tool, env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self { http, config }
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET a URL and map non-success statuses to [`FetchError::ApiError`].
    ///
    /// No retries and no backoff anywhere: every caller either degrades or
    /// propagates, per the error-handling design.
    pub(crate) async fn make_request(&self, url: &str) -> Result<Response> {
        debug!(url, "Making API request");
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "API request failed");
            return Err(FetchError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}
