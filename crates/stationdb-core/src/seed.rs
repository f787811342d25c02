use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::station::StationRecord;
use crate::ConfigError;

const WIKIPEDIA_ARTICLE_BASE: &str = "https://en.wikipedia.org/wiki/";

/// One station entry in the seed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedStation {
    pub city: String,
    /// Article title, e.g. `WBRC` or `KBVU (TV)`.
    pub station: String,
    #[serde(default)]
    pub fcc_url: Option<String>,
}

impl SeedStation {
    /// Encyclopedia article URL for this station; spaces become underscores.
    #[must_use]
    pub fn wikipedia_url(&self) -> String {
        format!(
            "{WIKIPEDIA_ARTICLE_BASE}{}",
            self.station.trim().replace(' ', "_")
        )
    }

    /// Article title with any parenthetical disambiguator removed.
    #[must_use]
    pub fn call_sign(&self) -> String {
        self.station
            .split(" (")
            .next()
            .unwrap_or(&self.station)
            .trim()
            .to_string()
    }
}

/// State → stations, as authored in `config/stations.yaml`.
#[derive(Debug, Deserialize)]
pub struct StationDirectory {
    pub states: BTreeMap<String, Vec<SeedStation>>,
}

impl StationDirectory {
    /// Expand the directory into seed records, states in alphabetical order
    /// and stations in authored order within each state.
    #[must_use]
    pub fn into_records(self) -> Vec<StationRecord> {
        self.states
            .into_iter()
            .flat_map(|(state, stations)| {
                stations.into_iter().map(move |s| StationRecord {
                    call_sign: Some(s.call_sign()),
                    wikipedia_url: Some(s.wikipedia_url()),
                    state: Some(state.clone()),
                    city: Some(s.city),
                    fcc_url: s.fcc_url,
                })
            })
            .collect()
    }

    #[must_use]
    pub fn station_count(&self) -> usize {
        self.states.values().map(Vec::len).sum()
    }
}

/// Load and validate the station seed directory from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_station_directory(path: &Path) -> Result<StationDirectory, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::StationDirectoryIo {
            path: path.display().to_string(),
            source: e,
        })?;

    let directory: StationDirectory =
        serde_yaml::from_str(&content).map_err(ConfigError::StationDirectoryParse)?;

    validate_directory(&directory)?;

    Ok(directory)
}

fn validate_directory(directory: &StationDirectory) -> Result<(), ConfigError> {
    let mut seen_call_signs = HashSet::new();

    for (state, stations) in &directory.states {
        if state.trim().is_empty() {
            return Err(ConfigError::Validation(
                "state name must be non-empty".to_string(),
            ));
        }

        for station in stations {
            if station.station.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "station in {state} has an empty name"
                )));
            }
            if station.city.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "station '{}' in {state} has an empty city",
                    station.station
                )));
            }
            if let Some(fcc_url) = &station.fcc_url {
                if url::Url::parse(fcc_url).is_err() {
                    return Err(ConfigError::Validation(format!(
                        "station '{}' has an invalid fcc_url: '{fcc_url}'",
                        station.station
                    )));
                }
            }

            let call_sign = station.call_sign().to_uppercase();
            if !seen_call_signs.insert(call_sign) {
                return Err(ConfigError::Validation(format!(
                    "duplicate call sign: '{}' (in {state})",
                    station.call_sign()
                )));
            }
        }
    }

    Ok(())
}
