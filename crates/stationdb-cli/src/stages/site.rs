use std::time::Duration;

use stationdb_core::{AppConfig, ContactFacts, EnhancedRecord, ResolutionStatus, Stage};
use stationdb_scraper::{
    extract_contact_page, extract_site_contacts, FetchClient, FetchError, FetchSettings,
};

use super::{present, RecordProcessor};

/// Pause before following a discovered contact page.
const CONTACT_PAGE_DELAY: Duration = Duration::from_secs(1);

/// Station website → contact facts, plus one follow-up fetch of the first
/// contact page the home page links to.
pub(crate) struct SiteProcessor {
    client: FetchClient,
    contact_page_client: FetchClient,
    contact_page_delay: Duration,
}

impl SiteProcessor {
    pub(crate) fn new(
        client: FetchClient,
        contact_page_client: FetchClient,
        contact_page_delay: Duration,
    ) -> Self {
        Self {
            client,
            contact_page_client,
            contact_page_delay,
        }
    }

    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let stage = config.stage(Stage::Site);
        Ok(Self::new(
            FetchClient::new(FetchSettings::for_stage(stage, &config.user_agent))?,
            FetchClient::new(FetchSettings::contact_page(stage, &config.user_agent))?,
            CONTACT_PAGE_DELAY,
        ))
    }

    /// Merge the contact page's phones and emails into `facts`. Failure only
    /// costs the extra facts.
    async fn scrape_contact_page(&self, label: &str, url: &str, facts: &mut ContactFacts) {
        tokio::time::sleep(self.contact_page_delay).await;
        match self.contact_page_client.fetch(url).await {
            Ok(doc) => {
                tracing::debug!(call_sign = %label, url = %doc.final_url, "scraping contact page");
                extract_contact_page(&doc.body, facts);
            }
            Err(e) => {
                tracing::warn!(call_sign = %label, url = %url, error = %e, "contact page fetch failed");
            }
        }
    }
}

impl RecordProcessor for SiteProcessor {
    fn stage(&self) -> Stage {
        Stage::Site
    }

    fn is_eligible(&self, record: &EnhancedRecord) -> bool {
        record.status == Some(ResolutionStatus::Found) && record.website().is_some()
    }

    async fn process(&self, mut record: EnhancedRecord) -> EnhancedRecord {
        let label = record.station.label();
        let Some(url) = present(record.website()).map(str::to_owned) else {
            record.contact_details = Some(ContactFacts::failed("record has no officialWebsite"));
            return record;
        };

        let facts = match self.client.fetch(&url).await {
            Ok(doc) => {
                let mut facts = ContactFacts::fetched(doc.final_url.as_str());
                let contact_page = extract_site_contacts(&doc.body, &doc.final_url, &mut facts);
                if let Some(contact_page) = contact_page {
                    self.scrape_contact_page(&label, &contact_page, &mut facts)
                        .await;
                }
                tracing::info!(
                    call_sign = %label,
                    phones = facts.phone_numbers.len(),
                    emails = facts.email_addresses.len(),
                    contact_pages = facts.contact_page_links.len(),
                    "site contacts extracted"
                );
                facts
            }
            Err(e) => {
                tracing::warn!(call_sign = %label, url = %url, error = %e, "station website fetch failed");
                ContactFacts::failed(e.to_string())
            }
        };
        record.contact_details = Some(facts);
        record
    }
}
