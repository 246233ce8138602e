//! Data model for a single fetch run
//!
//! Everything here is created and consumed within one run; only the
//! [`SearchResultBundle`] (and the PDFs themselves) outlive it.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::common::{PmcId, Pmid};

/// Insertion-ordered PMID -> PMC ID mapping built during conversion.
///
/// Keys are unique; a later insert for a PMID already present is ignored.
/// Reverse lookup walks entries in insertion order and returns the first
/// match, which is the accepted policy when several PMIDs convert to the
/// same PMC ID. Linear scans are fine at this scale (tens of entries).
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    entries: Vec<(Pmid, PmcId)>,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a conversion. Returns false when the PMID was already mapped.
    pub fn insert(&mut self, pmid: Pmid, pmcid: PmcId) -> bool {
        if self.entries.iter().any(|(p, _)| *p == pmid) {
            return false;
        }
        self.entries.push((pmid, pmcid));
        true
    }

    /// First PMID that maps to the given PMC ID, in insertion order
    pub fn source_for(&self, pmcid: &PmcId) -> Option<&Pmid> {
        self.entries
            .iter()
            .find(|(_, c)| c == pmcid)
            .map(|(p, _)| p)
    }

    /// Mapped PMC IDs in insertion order
    pub fn targets(&self) -> impl Iterator<Item = &PmcId> {
        self.entries.iter().map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolved bibliographic record for one article.
///
/// Fields are never empty: anything absent upstream is replaced by its
/// placeholder at construction. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub pmcid: String,
    pub pmid: String,
    pub title: String,
    pub doi: String,
}

impl PaperRecord {
    pub const UNKNOWN_PMID: &'static str = "Unknown PMID";
    pub const UNKNOWN_TITLE: &'static str = "Unknown Title";
    pub const UNKNOWN_DOI: &'static str = "Unknown DOI";

    pub fn new(
        pmcid: &PmcId,
        pmid: Option<&Pmid>,
        title: Option<String>,
        doi: Option<String>,
    ) -> Self {
        Self {
            pmcid: pmcid.to_string(),
            pmid: pmid.map_or_else(|| Self::UNKNOWN_PMID.to_string(), |p| p.to_string()),
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| Self::UNKNOWN_TITLE.to_string()),
            doi: doi
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| Self::UNKNOWN_DOI.to_string()),
        }
    }

    /// All-placeholder record used when the summary request fails outright
    pub fn degraded(pmcid: &PmcId) -> Self {
        Self::new(pmcid, None, None, None)
    }
}

/// Write-once record of one search run, serialized to the results artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultBundle {
    pub search_term: String,
    pub search_date: DateTime<Local>,
    pub total_papers: usize,
    pub papers: Vec<PaperRecord>,
}

impl SearchResultBundle {
    pub fn new(search_term: &str, papers: Vec<PaperRecord>) -> Self {
        Self {
            search_term: search_term.to_string(),
            search_date: Local::now(),
            total_papers: papers.len(),
            papers,
        }
    }
}
