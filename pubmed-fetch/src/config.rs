//! Client and download configuration
//!
//! The original tool kept its endpoints, directories and delays as mutable
//! state on a controller object; here they live in two explicit config
//! structs handed to stateless components.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// NCBI E-utilities base URL (ESearch, ESummary)
pub const DEFAULT_EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// NCBI ID Converter endpoint (PMID -> PMCID)
pub const DEFAULT_IDCONV_BASE_URL: &str = "https://www.ncbi.nlm.nih.gov/pmc/utils/idconv/v1.0/";

/// PMC article page base URL
pub const DEFAULT_ARTICLE_BASE_URL: &str = "https://www.ncbi.nlm.nih.gov/pmc/articles";

/// Accessible label of the PDF download anchor on PMC article pages
pub const DEFAULT_PDF_LINK_LABEL: &str = "Download PDF";

/// Configuration for [`PubMedClient`](crate::client::PubMedClient)
///
/// # Example
///
/// ```
/// use pubmed_fetch::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_email("researcher@university.edu")
///     .with_tool("my-fetcher");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for E-utilities requests (overridable for tests)
    pub eutils_base_url: String,
    /// Base URL for ID Converter requests (overridable for tests)
    pub idconv_base_url: String,
    /// Tool name sent with ID Converter requests
    pub tool: String,
    /// Contact email sent with ID Converter requests
    pub email: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            eutils_base_url: DEFAULT_EUTILS_BASE_URL.to_string(),
            idconv_base_url: DEFAULT_IDCONV_BASE_URL.to_string(),
            tool: "pubmed-fetch".to_string(),
            email: "user@example.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the E-utilities base URL (used by tests to point at a mock server)
    pub fn with_eutils_base_url(mut self, url: impl Into<String>) -> Self {
        self.eutils_base_url = trim_trailing_slash(url.into());
        self
    }

    /// Override the ID Converter base URL
    pub fn with_idconv_base_url(mut self, url: impl Into<String>) -> Self {
        self.idconv_base_url = url.into();
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// How a located PDF gets onto disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadMethod {
    /// Click the download anchor and let the browser write the file
    #[default]
    Browser,
    /// Read the anchor's href and stream the PDF over HTTP
    Http,
}

/// Configuration for the download orchestrator
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Working directory that receives downloads and the results artifact
    pub download_dir: PathBuf,
    /// WebDriver server URL (chromedriver)
    pub webdriver_url: String,
    /// Base URL for article pages (overridable for tests)
    pub article_base_url: String,
    /// Accessible label used to locate the download anchor
    pub pdf_link_label: String,
    /// Download method
    pub method: DownloadMethod,
    /// Upper bound on waiting for a clicked download to settle.
    ///
    /// There is no completion signal from the browser; a new PDF whose size
    /// stops changing between polls is taken as done. This is a heuristic,
    /// not a guarantee.
    pub settle_timeout: Duration,
    /// Interval between download-directory polls
    pub poll_interval: Duration,
    /// Fixed pause between records
    pub pacing_delay: Duration,
    /// HTTP timeout for direct PDF downloads
    pub timeout: Duration,
}

impl DownloadConfig {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            webdriver_url: "http://localhost:9515".to_string(),
            article_base_url: DEFAULT_ARTICLE_BASE_URL.to_string(),
            pdf_link_label: DEFAULT_PDF_LINK_LABEL.to_string(),
            method: DownloadMethod::Browser,
            settle_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(500),
            pacing_delay: Duration::from_secs(2),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = url.into();
        self
    }

    pub fn with_article_base_url(mut self, url: impl Into<String>) -> Self {
        self.article_base_url = trim_trailing_slash(url.into());
        self
    }

    pub fn with_pdf_link_label(mut self, label: impl Into<String>) -> Self {
        self.pdf_link_label = label.into();
        self
    }

    pub fn with_method(mut self, method: DownloadMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    /// Canonical article page URL for a PMC ID
    pub fn article_url(&self, pmcid: &str) -> String {
        format!("{}/{}/", self.article_base_url, pmcid)
    }

    /// Canonical on-disk path for a PMC ID
    pub fn canonical_path(&self, pmcid: &str) -> PathBuf {
        self.download_dir.join(format!("{pmcid}.pdf"))
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }
}

fn trim_trailing_slash(mut s: String) -> String {
    while s.ends_with('/') {
        s.pop();
    }
    s
}
