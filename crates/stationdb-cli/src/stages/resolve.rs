use stationdb_core::{AppConfig, ContactFacts, EnhancedRecord, ResolutionStatus, Stage};
use stationdb_scraper::{resolve_official_website, FetchClient, FetchError, FetchSettings};

use super::{present, RecordProcessor};

/// Encyclopedia article → official website.
pub(crate) struct ResolveProcessor {
    client: FetchClient,
}

impl ResolveProcessor {
    pub(crate) fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let settings = FetchSettings::for_stage(config.stage(Stage::Resolve), &config.user_agent);
        Ok(Self::new(FetchClient::new(settings)?))
    }
}

impl RecordProcessor for ResolveProcessor {
    fn stage(&self) -> Stage {
        Stage::Resolve
    }

    fn is_eligible(&self, record: &EnhancedRecord) -> bool {
        present(record.station.wikipedia_url.as_deref()).is_some()
    }

    async fn process(&self, mut record: EnhancedRecord) -> EnhancedRecord {
        let label = record.station.label();
        let Some(url) = present(record.station.wikipedia_url.as_deref()).map(str::to_owned) else {
            record.set_official_website(None);
            record.status = Some(ResolutionStatus::Error);
            record.error = Some("record has no wikipediaURL".to_owned());
            record.website_resolution = Some(ContactFacts::failed("record has no wikipediaURL"));
            return record;
        };

        match self.client.fetch(&url).await {
            Ok(doc) => {
                let call_sign = record.station.call_sign();
                let mut facts = ContactFacts::fetched(doc.final_url.as_str());
                match resolve_official_website(&doc.body, call_sign.as_deref()) {
                    Some(found) => {
                        tracing::info!(call_sign = %label, website = %found.url, method = %found.method, "official website found");
                        facts.detection_methods.insert(found.method);
                        facts.official_website = Some(found.url.clone());
                        record.set_official_website(Some(found.url));
                        record.status = Some(ResolutionStatus::Found);
                    }
                    None => {
                        tracing::info!(call_sign = %label, "no official website found");
                        record.set_official_website(None);
                        record.status = Some(ResolutionStatus::NotFound);
                    }
                }
                record.error = None;
                record.website_resolution = Some(facts);
            }
            Err(e) => {
                tracing::warn!(call_sign = %label, url = %url, error = %e, "article fetch failed");
                record.set_official_website(None);
                record.status = Some(ResolutionStatus::Error);
                record.error = Some(e.to_string());
                record.website_resolution = Some(ContactFacts::failed(e.to_string()));
            }
        }
        record
    }
}
