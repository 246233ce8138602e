//! Results persistence
//!
//! The one step allowed to abort a run: silently losing the search record
//! would defeat the run's purpose, so I/O failures propagate.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, instrument};

use crate::error::{FetchError, Result};
use crate::model::{PaperRecord, SearchResultBundle};

/// Serialize the resolved records to a timestamped JSON artifact in `dir`.
///
/// The filename is keyed by the query term (spaces as underscores) and a
/// second-granularity timestamp, which is collision-proof enough for
/// single sequential runs.
#[instrument(skip(papers), fields(count = papers.len()))]
pub fn persist_results(
    papers: &[PaperRecord],
    search_term: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let bundle = SearchResultBundle::new(search_term, papers.to_vec());

    let filename = format!(
        "search_results_{}_{}.json",
        search_term.replace(' ', "_"),
        Local::now().format("%Y%m%d_%H%M%S"),
    );
    let path = dir.join(filename);

    let json = serde_json::to_string_pretty(&bundle)?;
    fs::write(&path, json).map_err(|source| FetchError::PersistError {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "Search results saved");
    Ok(path)
}
