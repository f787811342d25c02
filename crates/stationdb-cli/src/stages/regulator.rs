use stationdb_core::{AppConfig, ContactFacts, EnhancedRecord, Stage};
use stationdb_scraper::{extract_regulator_contacts, FetchClient, FetchError, FetchSettings};

use super::{present, RecordProcessor};

/// Regulator public-file page → contact facts.
pub(crate) struct RegulatorProcessor {
    client: FetchClient,
}

impl RegulatorProcessor {
    pub(crate) fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let settings =
            FetchSettings::for_stage(config.stage(Stage::Regulator), &config.user_agent);
        Ok(Self::new(FetchClient::new(settings)?))
    }
}

impl RecordProcessor for RegulatorProcessor {
    fn stage(&self) -> Stage {
        Stage::Regulator
    }

    fn is_eligible(&self, record: &EnhancedRecord) -> bool {
        present(record.station.fcc_url.as_deref()).is_some()
    }

    async fn process(&self, mut record: EnhancedRecord) -> EnhancedRecord {
        let label = record.station.label();
        let Some(url) = present(record.station.fcc_url.as_deref()).map(str::to_owned) else {
            record.fcc_contact_info = Some(ContactFacts::failed("record has no fccURL"));
            return record;
        };

        let facts = match self.client.fetch(&url).await {
            Ok(doc) => {
                let mut facts = ContactFacts::fetched(doc.final_url.as_str());
                extract_regulator_contacts(&doc.body, &doc.final_url, &mut facts);
                tracing::info!(
                    call_sign = %label,
                    phones = facts.phone_numbers.len(),
                    emails = facts.email_addresses.len(),
                    main_studio_address = facts.main_studio_address.is_some(),
                    "regulator contacts extracted"
                );
                facts
            }
            Err(e) => {
                tracing::warn!(call_sign = %label, url = %url, error = %e, "regulator page fetch failed");
                ContactFacts::failed(e.to_string())
            }
        };
        record.fcc_contact_info = Some(facts);
        record
    }
}
