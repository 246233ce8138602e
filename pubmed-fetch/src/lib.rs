//! # pubmed-fetch
//!
//! Search PubMed for free-full-text articles, map each PMID to its PMC ID,
//! resolve bibliographic metadata, persist a timestamped record of the run,
//! and drive a browser session per article to download the PDF under its
//! canonical `<PMCID>.pdf` name.
//!
//! ## Quick start
//!
//! ```no_run
//! use pubmed_fetch::{ClientConfig, DownloadConfig, Fetcher, WebDriverProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let download = DownloadConfig::new("downloads");
//!     let provider = WebDriverProvider::new("http://localhost:9515", "downloads");
//!
//!     let fetcher = Fetcher::new(ClientConfig::new(), download);
//!     let report = fetcher.run("sepsis treatment", 5, &provider).await?;
//!
//!     println!(
//!         "{}/{} PDFs downloaded, results in {}",
//!         report.succeeded,
//!         report.attempted,
//!         report.bundle_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! The downloads are strictly sequential: one exclusively-owned browser
//! session per article, a fixed pacing delay between articles, and no
//! retries anywhere. Only a persistence failure aborts a run; every other
//! failure degrades the affected item or batch and is reported in the
//! [`RunReport`].

pub mod client;
pub mod common;
pub mod config;
pub mod download;
pub mod error;
pub mod model;
pub mod persist;
pub mod pipeline;

// Re-export main types for convenience
pub use client::PubMedClient;
pub use common::{PmcId, Pmid};
pub use config::{ClientConfig, DownloadConfig, DownloadMethod};
pub use download::{
    ArticleSession, DownloadOrchestrator, DownloadOutcome, DownloadReport, DownloadStage, SavedPdf,
    SessionProvider, WebDriverProvider,
};
pub use error::{FetchError, Result};
pub use model::{IdMap, PaperRecord, SearchResultBundle};
pub use persist::persist_results;
pub use pipeline::{Fetcher, RunReport};
