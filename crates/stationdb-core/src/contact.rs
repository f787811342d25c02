//! Contact facts attached to a station record by one pipeline stage.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label identifying which extraction strategy contributed a fact.
///
/// Serialized as a snake_case label so output files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    // Official-website resolution (encyclopedia article).
    InfoboxWebsite,
    ExternalLinksOfficial,
    InfoboxLink,
    CallSignPattern,
    ExternalLinksFallback,

    // Station website.
    MainPageContent,
    ContactSection,
    ContactViaEmail,
    ContactPageLinks,
    ContactPageScrape,

    // Regulator filing.
    MainStudioAddress,
    MainStudioSection,
    CarriageElectionSection,
    ContactInformationSection,
    GeneralPageScan,
}

impl DetectionMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InfoboxWebsite => "infobox_website",
            Self::ExternalLinksOfficial => "external_links_official",
            Self::InfoboxLink => "infobox_link",
            Self::CallSignPattern => "call_sign_pattern",
            Self::ExternalLinksFallback => "external_links_fallback",
            Self::MainPageContent => "main_page_content",
            Self::ContactSection => "contact_section",
            Self::ContactViaEmail => "contact_via_email",
            Self::ContactPageLinks => "contact_page_links",
            Self::ContactPageScrape => "contact_page_scrape",
            Self::MainStudioAddress => "main_studio_address",
            Self::MainStudioSection => "main_studio_section",
            Self::CarriageElectionSection => "carriage_election_section",
            Self::ContactInformationSection => "contact_information_section",
            Self::GeneralPageScan => "general_page_scan",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enrichment produced by one stage for one station.
///
/// Sets are ordered so repeated runs over the same documents serialize
/// identically. A failed stage (`success == false`) never carries facts;
/// use [`ContactFacts::failed`] to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFacts {
    #[serde(default)]
    pub phone_numbers: BTreeSet<String>,
    #[serde(default)]
    pub email_addresses: BTreeSet<String>,
    #[serde(default)]
    pub contact_page_links: BTreeSet<String>,
    #[serde(default)]
    pub detection_methods: BTreeSet<DetectionMethod>,
    /// Resolver stage only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_website: Option<String>,
    /// Post-redirect URL the facts were read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_studio_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carriage_election_contact: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl ContactFacts {
    /// Empty, successful facts for a document that was fetched at `scraped_url`.
    #[must_use]
    pub fn fetched(scraped_url: impl Into<String>) -> Self {
        Self {
            phone_numbers: BTreeSet::new(),
            email_addresses: BTreeSet::new(),
            contact_page_links: BTreeSet::new(),
            detection_methods: BTreeSet::new(),
            official_website: None,
            scraped_url: Some(scraped_url.into()),
            main_studio_address: None,
            carriage_election_contact: None,
            success: true,
            error: None,
            scraped_at: Utc::now(),
        }
    }

    /// Facts for a record whose fetch failed after retries.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            phone_numbers: BTreeSet::new(),
            email_addresses: BTreeSet::new(),
            contact_page_links: BTreeSet::new(),
            detection_methods: BTreeSet::new(),
            official_website: None,
            scraped_url: None,
            main_studio_address: None,
            carriage_election_contact: None,
            success: false,
            error: Some(error.into()),
            scraped_at: Utc::now(),
        }
    }

    /// Adds phone numbers found by `method`. The method is recorded only
    /// when the strategy produced at least one value.
    pub fn add_phones<I>(&mut self, method: DetectionMethod, phones: I)
    where
        I: IntoIterator<Item = String>,
    {
        if extend_counting(&mut self.phone_numbers, phones) > 0 {
            self.detection_methods.insert(method);
        }
    }

    pub fn add_emails<I>(&mut self, method: DetectionMethod, emails: I)
    where
        I: IntoIterator<Item = String>,
    {
        if extend_counting(&mut self.email_addresses, emails) > 0 {
            self.detection_methods.insert(method);
        }
    }

    pub fn add_contact_links<I>(&mut self, method: DetectionMethod, links: I)
    where
        I: IntoIterator<Item = String>,
    {
        if extend_counting(&mut self.contact_page_links, links) > 0 {
            self.detection_methods.insert(method);
        }
    }

    /// `true` when any phone, email, or contact page link was found.
    #[must_use]
    pub fn has_any(&self) -> bool {
        !self.phone_numbers.is_empty()
            || !self.email_addresses.is_empty()
            || !self.contact_page_links.is_empty()
    }
}

/// Counts values offered, not values newly inserted: a strategy that finds a
/// number another strategy already found still contributed it.
fn extend_counting<I>(set: &mut BTreeSet<String>, values: I) -> usize
where
    I: IntoIterator<Item = String>,
{
    let mut offered = 0;
    for value in values {
        offered += 1;
        set.insert(value);
    }
    offered
}
