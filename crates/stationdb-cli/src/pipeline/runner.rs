use std::path::PathBuf;

use stationdb_core::{EnhancedRecord, StageConfig};

use super::checkpoint::{write_json, CheckpointStore};
use super::input::load_input;
use super::PipelineError;
use crate::stages::RecordProcessor;

/// Where a pass reads from and writes to, plus the optional resume cursor
/// and record cap.
#[derive(Debug, Clone)]
pub(crate) struct PassOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Call sign of the first record to process; earlier records are taken
    /// from the checkpoint.
    pub resume_from: Option<String>,
    /// Only the first N eligible records.
    pub limit: Option<usize>,
}

/// What a completed pass produced.
#[derive(Debug)]
pub(crate) struct PassSummary {
    /// Final output, in input order.
    pub records: Vec<EnhancedRecord>,
    /// Records run through the processor in this pass.
    pub processed: usize,
    /// Processed records whose stage facts are unsuccessful.
    pub failed: usize,
    /// Input records that were not eligible for the stage.
    pub skipped: usize,
    /// Records taken from the checkpoint (or carried over) on resume.
    pub resumed: usize,
    pub checkpoint_writes: usize,
}

/// Run one stage over its input file.
///
/// Records are processed strictly in order with the stage delay between
/// them. Every `checkpoint_every` records the accumulated output is saved to
/// a side file; a failed checkpoint write is only a warning. The final write
/// is fatal on failure and leaves the checkpoint in place.
///
/// # Errors
///
/// Returns [`PipelineError`] when the input is unreadable, malformed, or
/// missing a required field, when the resume station is not found, or when
/// the final output cannot be written.
pub(crate) async fn run_pass<P: RecordProcessor>(
    processor: &P,
    cfg: &StageConfig,
    opts: &PassOptions,
) -> Result<PassSummary, PipelineError> {
    let stage = processor.stage();
    let input = load_input(&opts.input, stage)?;
    let input_len = input.len();

    let mut eligible: Vec<EnhancedRecord> = input
        .into_iter()
        .filter(|record| processor.is_eligible(record))
        .collect();
    let skipped = input_len - eligible.len();
    if skipped > 0 {
        tracing::info!(%stage, skipped, "skipping records not eligible for this stage");
    }
    if let Some(limit) = opts.limit {
        eligible.truncate(limit);
    }

    let checkpoint = CheckpointStore::for_output(&opts.output);
    let (mut results, pending) = match opts.resume_from.as_deref() {
        Some(call_sign) => {
            let index = eligible
                .iter()
                .position(|r| {
                    r.station
                        .call_sign()
                        .is_some_and(|c| c.eq_ignore_ascii_case(call_sign))
                })
                .ok_or_else(|| PipelineError::ResumeCursorNotFound {
                    call_sign: call_sign.to_owned(),
                })?;
            let pending = eligible.split_off(index);
            tracing::info!(%stage, call_sign, index, "resuming pass");
            (resume_prefix(&checkpoint, eligible), pending)
        }
        None => (Vec::with_capacity(eligible.len()), eligible),
    };
    let resumed = results.len();

    let total = pending.len();
    let offset = resumed;
    let mut failed = 0;
    let mut checkpoint_writes = 0;

    for (i, record) in pending.into_iter().enumerate() {
        tracing::info!(
            %stage,
            call_sign = %record.station.label(),
            position = offset + i + 1,
            of = offset + total,
            "processing record"
        );

        let enriched = processor.process(record).await;
        if !enriched.facts_for(stage).is_some_and(|facts| facts.success) {
            failed += 1;
        }
        results.push(enriched);

        if cfg.checkpoint_every > 0 && (i + 1) % cfg.checkpoint_every == 0 {
            match checkpoint.save(&results) {
                Ok(()) => {
                    checkpoint_writes += 1;
                    tracing::info!(%stage, saved = results.len(), "checkpoint saved");
                }
                Err(e) => tracing::warn!(
                    %stage,
                    path = %checkpoint.path().display(),
                    error = %e,
                    "checkpoint write failed, continuing"
                ),
            }
        }

        if i + 1 < total {
            tokio::time::sleep(cfg.delay()).await;
        }
    }

    write_json(&opts.output, &results).map_err(|source| PipelineError::OutputWrite {
        path: opts.output.clone(),
        source,
    })?;
    checkpoint.remove();
    tracing::info!(%stage, path = %opts.output.display(), records = results.len(), "output written");

    Ok(PassSummary {
        records: results,
        processed: total,
        failed,
        skipped,
        resumed,
        checkpoint_writes,
    })
}

/// The first `done.len()` output records for a resumed pass: checkpointed
/// records where available, the remaining input records unprocessed where
/// the checkpoint falls short.
fn resume_prefix(checkpoint: &CheckpointStore, done: Vec<EnhancedRecord>) -> Vec<EnhancedRecord> {
    let index = done.len();
    let mut prior = checkpoint.load().unwrap_or_default();
    if prior.len() > index {
        tracing::info!(
            checkpointed = prior.len(),
            index,
            "dropping checkpointed records at or after the resume station"
        );
        prior.truncate(index);
    }
    if prior.len() < index {
        tracing::warn!(
            checkpointed = prior.len(),
            index,
            "checkpoint shorter than resume index, carrying earlier records over unprocessed"
        );
        let have = prior.len();
        prior.extend(done.into_iter().skip(have));
    } else {
        tracing::info!(checkpointed = prior.len(), "loaded checkpointed records");
    }
    prior
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
