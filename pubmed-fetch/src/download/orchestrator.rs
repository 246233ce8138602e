//! Per-record download state machine
//!
//! Each record moves through
//! `Pending -> SessionOpened -> LocatedLink -> Clicked -> AwaitingFile -> Renamed`.
//! Any step can fail; the outcome then carries the last stage reached. The
//! session is released whatever happens, and a failed record never stops
//! the batch.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use reqwest::Client;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::browser::{ArticleSession, SessionProvider};
use crate::config::{DownloadConfig, DownloadMethod};
use crate::error::{FetchError, Result};
use crate::model::PaperRecord;

/// Step of the download state machine a record last reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStage {
    Pending,
    SessionOpened,
    LocatedLink,
    Clicked,
    AwaitingFile,
    Renamed,
}

/// How the PDF ended up on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedPdf {
    /// A fresh download was renamed to the canonical filename
    Renamed(PathBuf),
    /// The canonical file already existed; nothing was overwritten
    AlreadyPresent(PathBuf),
}

impl SavedPdf {
    pub fn path(&self) -> &Path {
        match self {
            SavedPdf::Renamed(p) | SavedPdf::AlreadyPresent(p) => p,
        }
    }
}

/// Outcome of one download attempt
#[derive(Debug)]
pub struct DownloadOutcome {
    pub pmcid: String,
    pub success: bool,
    pub stage: DownloadStage,
    pub file: Option<PathBuf>,
    pub error: Option<FetchError>,
}

/// Aggregated outcomes for a run
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub outcomes: Vec<DownloadOutcome>,
}

impl DownloadReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }
}

/// Drives browser sessions to fetch one PDF per resolved record
pub struct DownloadOrchestrator {
    config: DownloadConfig,
    http: Client,
}

impl DownloadOrchestrator {
    pub fn new(config: DownloadConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { config, http }
    }

    /// Download every record sequentially, pacing between records.
    ///
    /// Never fails as a whole: each record gets exactly one attempt and its
    /// outcome lands in the report.
    pub async fn download_all<P: SessionProvider>(
        &self,
        papers: &[PaperRecord],
        provider: &P,
    ) -> DownloadReport {
        let mut report = DownloadReport::default();

        for (index, paper) in papers.iter().enumerate() {
            info!(
                position = index + 1,
                total = papers.len(),
                pmcid = %paper.pmcid,
                title = %paper.title,
                "Processing record"
            );

            report.outcomes.push(self.download_one(paper, provider).await);

            if index + 1 < papers.len() {
                sleep(self.config.pacing_delay).await;
            }
        }

        report
    }

    /// Run one record through the state machine
    #[instrument(skip(self, provider), fields(pmcid = %paper.pmcid))]
    pub async fn download_one<P: SessionProvider>(
        &self,
        paper: &PaperRecord,
        provider: &P,
    ) -> DownloadOutcome {
        let mut stage = DownloadStage::Pending;
        let result = self.attempt(paper, provider, &mut stage).await;

        match result {
            Ok(saved) => {
                match &saved {
                    SavedPdf::Renamed(path) => {
                        info!(file = %path.display(), "Download complete")
                    }
                    SavedPdf::AlreadyPresent(path) => {
                        info!(file = %path.display(), "File already present, skipping rename")
                    }
                }
                DownloadOutcome {
                    pmcid: paper.pmcid.clone(),
                    success: true,
                    stage: DownloadStage::Renamed,
                    file: Some(saved.path().to_path_buf()),
                    error: None,
                }
            }
            Err(error) => {
                warn!(%error, ?stage, "Download failed");
                DownloadOutcome {
                    pmcid: paper.pmcid.clone(),
                    success: false,
                    stage,
                    file: None,
                    error: Some(error),
                }
            }
        }
    }

    async fn attempt<P: SessionProvider>(
        &self,
        paper: &PaperRecord,
        provider: &P,
        stage: &mut DownloadStage,
    ) -> Result<SavedPdf> {
        let mut session = provider.open_session().await?;
        *stage = DownloadStage::SessionOpened;

        let result = self.drive(&mut session, paper, stage).await;

        // Session release happens regardless of outcome.
        if let Err(close_err) = session.close().await {
            warn!(error = %close_err, "Failed to close browser session");
        }

        result
    }

    async fn drive<S: ArticleSession>(
        &self,
        session: &mut S,
        paper: &PaperRecord,
        stage: &mut DownloadStage,
    ) -> Result<SavedPdf> {
        let article_url = self.config.article_url(&paper.pmcid);
        session.navigate(&article_url).await?;

        let href = session
            .locate_pdf_link(&self.config.pdf_link_label)
            .await?
            .ok_or(FetchError::PdfLinkMissing {
                page: article_url.clone(),
            })?;
        *stage = DownloadStage::LocatedLink;
        debug!(href, "Located PDF link");

        match self.config.method {
            DownloadMethod::Browser => {
                session.click_pdf_link(&self.config.pdf_link_label).await?;
                *stage = DownloadStage::Clicked;

                *stage = DownloadStage::AwaitingFile;
                self.await_settled_download().await;

                finalize_download(&self.config.download_dir, &paper.pmcid)
            }
            DownloadMethod::Http => {
                let target = self.config.canonical_path(&paper.pmcid);
                if target.exists() {
                    return Ok(SavedPdf::AlreadyPresent(target));
                }
                let pdf_url = absolutize(&href, &article_url)?;
                *stage = DownloadStage::Clicked;
                self.fetch_pdf(&pdf_url, &target).await?;
                *stage = DownloadStage::AwaitingFile;
                Ok(SavedPdf::Renamed(target))
            }
        }
    }

    /// Wait for the clicked download to land.
    ///
    /// There is no completion signal from the browser, so the working
    /// directory is polled until the newest PDF's size stops changing, or
    /// until the settle timeout elapses. A timeout is not an error; the
    /// rename step decides whether anything usable arrived.
    async fn await_settled_download(&self) {
        let deadline = Instant::now() + self.config.settle_timeout;
        let mut last: Option<(PathBuf, u64)> = None;

        loop {
            sleep(self.config.poll_interval).await;

            let newest = newest_pdf(&self.config.download_dir)
                .ok()
                .flatten()
                .map(|entry| (entry.path, entry.size));

            if newest.is_some() && newest == last {
                debug!("Download settled");
                return;
            }

            last = newest;

            if Instant::now() >= deadline {
                warn!(
                    timeout_secs = self.config.settle_timeout.as_secs(),
                    "Download did not settle within the timeout, continuing anyway"
                );
                return;
            }
        }
    }

    /// Stream a PDF straight to the canonical path over HTTP
    async fn fetch_pdf(&self, pdf_url: &str, target: &Path) -> Result<()> {
        debug!(pdf_url, "Fetching PDF over HTTP");
        let response = self.http.get(pdf_url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(target, &bytes).await?;
        Ok(())
    }
}

struct PdfEntry {
    path: PathBuf,
    size: u64,
    modified: SystemTime,
}

/// Most recently modified `.pdf` in the directory, if any
fn newest_pdf(dir: &Path) -> std::io::Result<Option<PdfEntry>> {
    let mut newest: Option<PdfEntry> = None;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            continue;
        }

        let metadata = entry.metadata()?;
        let modified = metadata.modified()?;
        let replace = newest
            .as_ref()
            .map_or(true, |current| modified > current.modified);
        if replace {
            newest = Some(PdfEntry {
                path,
                size: metadata.len(),
                modified,
            });
        }
    }

    Ok(newest)
}

/// Rename the newest downloaded PDF to `<pmcid>.pdf`.
///
/// If the canonical file already exists the rename is skipped and the record
/// is treated as already downloaded; invoking this twice is a no-op, never
/// an overwrite.
fn finalize_download(dir: &Path, pmcid: &str) -> Result<SavedPdf> {
    let target = dir.join(format!("{pmcid}.pdf"));
    if target.exists() {
        return Ok(SavedPdf::AlreadyPresent(target));
    }

    let newest = newest_pdf(dir)?.ok_or_else(|| FetchError::DownloadedFileMissing {
        pmcid: pmcid.to_string(),
    })?;

    fs::rename(&newest.path, &target)?;
    Ok(SavedPdf::Renamed(target))
}

/// Resolve a possibly-relative href against the article page URL
fn absolutize(href: &str, base: &str) -> Result<String> {
    let base_url = Url::parse(base).map_err(|e| FetchError::InvalidPdfUrl {
        url: base.to_string(),
        message: e.to_string(),
    })?;
    let joined = base_url
        .join(href)
        .map_err(|e| FetchError::InvalidPdfUrl {
            url: href.to_string(),
            message: e.to_string(),
        })?;
    Ok(joined.into())
}
