//! ID Converter operation: PMID -> PMCID

use tracing::{debug, instrument};

use super::responses::IdConvResponse;
use super::PubMedClient;
use crate::common::{PmcId, Pmid};
use crate::error::Result;

impl PubMedClient {
    /// Convert one PMID to its PMC ID via the NCBI ID Converter.
    ///
    /// One request per PMID, no batching. `Ok(None)` means the article has
    /// no PMC version, a normal terminal state for roughly half of PubMed.
    /// Transport and decode failures surface as `Err`; the pipeline treats
    /// those as absent so a single bad conversion never aborts a batch.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_fetch::{PubMedClient, Pmid};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let pmid = Pmid::parse("31978945")?;
    ///     match client.convert_pmid(&pmid).await? {
    ///         Some(pmcid) => println!("{pmid} -> {pmcid}"),
    ///         None => println!("{pmid} has no PMC version"),
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(pmid = %pmid))]
    pub async fn convert_pmid(&self, pmid: &Pmid) -> Result<Option<PmcId>> {
        let config = self.config();
        let url = format!(
            "{}?tool={}&email={}&ids={}&format=json",
            config.idconv_base_url,
            urlencoding::encode(&config.tool),
            urlencoding::encode(&config.email),
            pmid,
        );

        let response = self.make_request(&url).await?;
        let data: IdConvResponse = response.json().await?;

        let pmcid = data
            .records
            .first()
            .and_then(|record| record.pmcid.as_deref())
            .and_then(|raw| PmcId::parse(raw).ok());

        if pmcid.is_none() {
            debug!("No PMC mapping in ID Converter response");
        }

        Ok(pmcid)
    }
}
