//! Station identity and the enriched record that accumulates stage output.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Deserializer, Serialize};

use crate::app_config::Stage;
use crate::contact::ContactFacts;

/// Identity for one broadcast station as seeded.
///
/// Every field is optional on the wire because each stage's input carries a
/// different subset; the coordinator validates the fields a stage needs
/// before processing starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_sign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(
        rename = "wikipediaURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub wikipedia_url: Option<String>,
    #[serde(rename = "fccURL", default, skip_serializing_if = "Option::is_none")]
    pub fcc_url: Option<String>,
}

impl StationRecord {
    /// The station's call sign: the explicit `callSign` field, or one derived
    /// from the encyclopedia article URL.
    #[must_use]
    pub fn call_sign(&self) -> Option<String> {
        self.call_sign
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .or_else(|| {
                self.wikipedia_url
                    .as_deref()
                    .and_then(call_sign_from_wikipedia_url)
            })
    }

    /// Short human label for log lines: call sign, else city/state.
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(call_sign) = self.call_sign() {
            return call_sign;
        }
        match (self.city.as_deref(), self.state.as_deref()) {
            (Some(city), Some(state)) => format!("{city}, {state}"),
            (Some(city), None) => city.to_owned(),
            _ => "<unnamed station>".to_owned(),
        }
    }
}

/// Terminal status of official-website resolution.
///
/// Values written by other tools are carried through as [`Self::Other`] so
/// they are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResolutionStatus {
    Found,
    NotFound,
    Error,
    Other(String),
}

impl ResolutionStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::Error => "error",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ResolutionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "found" => Self::Found,
            "not_found" => Self::NotFound,
            "error" => Self::Error,
            _ => Self::Other(raw),
        }
    }
}

impl From<ResolutionStatus> for String {
    fn from(status: ResolutionStatus) -> Self {
        match status {
            ResolutionStatus::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A station record plus every stage's enrichment, each under its own key.
///
/// Stages only ever fill their own field; a later stage leaves earlier
/// stages' fields untouched. Input keys this struct does not model are kept
/// in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedRecord {
    #[serde(flatten)]
    pub station: StationRecord,

    /// `None` when the key is absent, `Some(None)` for an explicit `null`.
    /// The resolver always writes the key.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub official_website: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResolutionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_resolution: Option<ContactFacts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<ContactFacts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcc_contact_info: Option<ContactFacts>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EnhancedRecord {
    #[must_use]
    pub fn new(station: StationRecord) -> Self {
        Self {
            station,
            official_website: None,
            status: None,
            error: None,
            website_resolution: None,
            contact_details: None,
            fcc_contact_info: None,
            extra: serde_json::Map::new(),
        }
    }

    /// The official website, if one was resolved and is non-blank.
    #[must_use]
    pub fn website(&self) -> Option<&str> {
        self.official_website
            .as_ref()
            .and_then(Option::as_deref)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Record the resolver's outcome; `None` is written out as `null`.
    pub fn set_official_website(&mut self, url: Option<String>) {
        self.official_website = Some(url);
    }

    /// The facts `stage` attached to this record, if it ran.
    #[must_use]
    pub fn facts_for(&self, stage: Stage) -> Option<&ContactFacts> {
        match stage {
            Stage::Resolve => self.website_resolution.as_ref(),
            Stage::Site => self.contact_details.as_ref(),
            Stage::Regulator => self.fcc_contact_info.as_ref(),
        }
    }

    /// `true` when any stage found a phone, email, or contact page link.
    #[must_use]
    pub fn has_contact_facts(&self) -> bool {
        [&self.contact_details, &self.fcc_contact_info]
            .into_iter()
            .flatten()
            .any(ContactFacts::has_any)
    }
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Derive a call sign from an article URL such as
/// `https://en.wikipedia.org/wiki/KBVU_(TV)`.
///
/// The last path segment is percent-decoded, underscores become spaces, and
/// a trailing parenthetical disambiguator is dropped (`"KBVU (TV)"` → `"KBVU"`).
#[must_use]
pub fn call_sign_from_wikipedia_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    if segments.next() != Some("wiki") {
        return None;
    }
    let title = segments.next().filter(|s| !s.is_empty())?;
    let decoded = percent_decode_str(title).decode_utf8().ok()?;
    let spaced = decoded.replace('_', " ");
    let name = spaced.split(" (").next().unwrap_or(&spaced).trim();
    (!name.is_empty()).then(|| name.to_owned())
}

#[cfg(test)]
#[path = "station_test.rs"]
mod tests;
