//! Pipeline coordinator: validates a stage's input, runs its record
//! processor over every eligible record in order, checkpoints partial
//! output, and writes the final result list.
//!
//! Per-record failures never leave this module as errors; they are recorded
//! on the record itself. Only input validation and the final output write
//! end a pass early.

mod checkpoint;
mod input;
pub(crate) mod report;
mod runner;

use std::path::PathBuf;

pub(crate) use runner::{run_pass, PassOptions, PassSummary};

use thiserror::Error;

/// Fatal coordinator outcomes.
#[derive(Debug, Error)]
pub(crate) enum PipelineError {
    #[error("failed to read input {path}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse input {path}: {source}\n  expected a JSON array shaped like {hint}")]
    InputParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
        hint: &'static str,
    },

    #[error("input {path} contains no records")]
    EmptyInput { path: PathBuf },

    #[error("first input record is missing required field `{field}`\n  expected a JSON array shaped like {hint}")]
    MissingField { field: &'static str, hint: &'static str },

    #[error("resume station {call_sign} not found among eligible input records")]
    ResumeCursorNotFound { call_sign: String },

    #[error("failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
