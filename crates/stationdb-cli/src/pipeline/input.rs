use std::path::Path;

use serde_json::Value;
use stationdb_core::{EnhancedRecord, Stage};

use super::PipelineError;

/// Example input for each stage, printed with validation failures.
fn expected_shape(stage: Stage) -> &'static str {
    match stage {
        Stage::Resolve => {
            r#"[{"wikipediaURL": "https://en.wikipedia.org/wiki/WBRC", "state": "Alabama", "city": "Birmingham"}]"#
        }
        Stage::Site => {
            r#"[{"wikipediaURL": "https://en.wikipedia.org/wiki/WBRC", "state": "Alabama", "city": "Birmingham", "officialWebsite": "https://www.wbrc.com", "status": "found"}]"#
        }
        Stage::Regulator => {
            r#"[{"callSign": "WBRC", "fccURL": "https://publicfiles.fcc.gov/tv-profile/wbrc"}]"#
        }
    }
}

/// Read a stage's input file and check that its first record carries every
/// field the stage requires.
pub(super) fn load_input(path: &Path, stage: Stage) -> Result<Vec<EnhancedRecord>, PipelineError> {
    let hint = expected_shape(stage);
    let content = std::fs::read_to_string(path).map_err(|source| PipelineError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |source| PipelineError::InputParse {
        path: path.to_path_buf(),
        source,
        hint,
    };

    let values: Vec<Value> = serde_json::from_str(&content).map_err(parse_error)?;
    let Some(first) = values.first() else {
        return Err(PipelineError::EmptyInput {
            path: path.to_path_buf(),
        });
    };

    if let Some(field) = stage
        .required_fields()
        .iter()
        .copied()
        .find(|field| !has_value(first, field))
    {
        return Err(PipelineError::MissingField { field, hint });
    }

    values
        .into_iter()
        .map(|value| serde_json::from_value(value).map_err(parse_error))
        .collect()
}

/// The key exists and is not a blank string. An explicit `null` counts: the
/// resolver writes `"officialWebsite": null` when it found nothing.
fn has_value(record: &Value, field: &str) -> bool {
    match record.get(field) {
        None => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}
