use std::path::Path;

use anyhow::Context;

/// Expand the station directory into resolver-stage input records.
pub(crate) fn run_seed(directory: &Path, output: &Path) -> anyhow::Result<usize> {
    let stations = stationdb_core::load_station_directory(directory)
        .with_context(|| format!("loading station directory {}", directory.display()))?;
    let states = stations.states.len();
    let records = stations.into_records();

    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;

    tracing::info!(
        states,
        stations = records.len(),
        path = %output.display(),
        "seed records written"
    );
    Ok(records.len())
}
