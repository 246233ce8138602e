use std::path::PathBuf;
use std::result;

use thiserror::Error;

/// Error types for the fetch pipeline
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Invalid PMID format
    #[error("Invalid PMID format: {pmid}")]
    InvalidPmid { pmid: String },

    /// Invalid PMC ID format
    #[error("Invalid PMC ID format: {pmcid}")]
    InvalidPmcid { pmcid: String },

    /// WebDriver command failed
    #[error("Browser session error: {0}")]
    WebDriverError(#[from] thirtyfour::error::WebDriverError),

    /// The article page exposes no PDF download affordance
    #[error("No PDF download link found on {page}")]
    PdfLinkMissing { page: String },

    /// The click produced no file in the working directory
    #[error("No downloaded file found for {pmcid}")]
    DownloadedFileMissing { pmcid: String },

    /// A PDF href could not be resolved against the article URL
    #[error("Invalid PDF URL {url}: {message}")]
    InvalidPdfUrl { url: String, message: String },

    /// Writing the search results artifact failed
    #[error("Failed to persist search results to {}: {source}", .path.display())]
    PersistError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error for file operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = result::Result<T, FetchError>;

impl FetchError {
    /// Whether this error must abort the run.
    ///
    /// Everything in the pipeline degrades per item or per batch, except
    /// losing the persisted search results (or the directory they live in),
    /// which defeats the purpose of the run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FetchError::PersistError { .. } | FetchError::IoError(_)
        )
    }
}
