//! ESummary operation: bibliographic metadata for converted articles

use tracing::{info, instrument, warn};

use super::responses::{ArticleId, ESummaryResponse};
use super::PubMedClient;
use crate::common::PmcId;
use crate::error::Result;
use crate::model::{IdMap, PaperRecord};

impl PubMedClient {
    /// Fetch title and DOI for a batch of PMC IDs and reconcile each with
    /// its source PMID through `id_map`.
    ///
    /// IDs are submitted with their numeric part only (the `PMC` prefix is
    /// re-added when parsing the response). Output order follows the order
    /// of the response's `uids` list. Missing fields become placeholders;
    /// an unmapped PMC ID gets the PMID placeholder. Empty input issues no
    /// request.
    #[instrument(skip(self, id_map), fields(pmcids_count = pmcids.len()))]
    pub async fn fetch_paper_details(
        &self,
        pmcids: &[PmcId],
        id_map: &IdMap,
    ) -> Result<Vec<PaperRecord>> {
        if pmcids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list: String = pmcids
            .iter()
            .map(PmcId::numeric_part)
            .collect::<Vec<_>>()
            .join(",");

        let url = format!(
            "{}/esummary.fcgi?db=pmc&id={}&retmode=json",
            self.config().eutils_base_url,
            id_list,
        );

        let response = self.make_request(&url).await?;
        let json_text = response.text().await?;
        let papers = parse_summary_response(&json_text, id_map)?;

        info!(
            requested = pmcids.len(),
            resolved = papers.len(),
            "ESummary completed"
        );
        Ok(papers)
    }
}

/// Walk the ESummary `result` object in `uids` order and build one
/// [`PaperRecord`] per document summary.
pub(crate) fn parse_summary_response(json_text: &str, id_map: &IdMap) -> Result<Vec<PaperRecord>> {
    let response: ESummaryResponse = serde_json::from_str(json_text)?;
    let result = &response.result;

    let uids: Vec<String> = result
        .get("uids")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let mut papers = Vec::with_capacity(uids.len());

    for uid in &uids {
        let Some(doc) = result.get(uid) else {
            warn!(uid, "UID missing from ESummary response");
            continue;
        };

        if doc.get("error").is_some() {
            warn!(uid, "ESummary returned an error for UID");
            continue;
        }

        let pmcid = match PmcId::parse(uid) {
            Ok(id) => id,
            Err(_) => {
                warn!(uid, "Skipping malformed UID in ESummary response");
                continue;
            }
        };

        let title = doc
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let doi = doc
            .get("articleids")
            .and_then(|v| v.as_array())
            .map(|ids| extract_doi(ids))
            .unwrap_or(None);

        let pmid = id_map.source_for(&pmcid);
        papers.push(PaperRecord::new(&pmcid, pmid, title, doi));
    }

    Ok(papers)
}

fn extract_doi(ids: &[serde_json::Value]) -> Option<String> {
    ids.iter()
        .filter_map(|v| serde_json::from_value::<ArticleId>(v.clone()).ok())
        .find(|aid| aid.idtype == "doi" && !aid.value.is_empty())
        .map(|aid| aid.value)
}
