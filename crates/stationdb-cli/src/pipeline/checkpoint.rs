use std::io;
use std::path::{Path, PathBuf};

use stationdb_core::EnhancedRecord;

const CHECKPOINT_SUFFIX: &str = ".temp";

/// Side file holding a pass's partial output, next to the final output.
#[derive(Debug, Clone)]
pub(super) struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub(super) fn for_output(output: &Path) -> Self {
        let mut name = output.as_os_str().to_owned();
        name.push(CHECKPOINT_SUFFIX);
        Self {
            path: PathBuf::from(name),
        }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    /// Records from a previous interrupted pass. A missing file means no
    /// progress was saved; an unreadable one is logged and treated the same.
    pub(super) fn load(&self) -> Option<Vec<EnhancedRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "checkpoint unreadable, ignoring");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "checkpoint corrupt, ignoring");
                None
            }
        }
    }

    /// Overwrite the checkpoint with the full accumulated result list.
    pub(super) fn save(&self, records: &[EnhancedRecord]) -> io::Result<()> {
        write_json(&self.path, records)
    }

    pub(super) fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "checkpoint removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove checkpoint");
            }
        }
    }
}

/// Pretty-printed JSON array, written whole.
pub(super) fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    std::fs::write(path, json)
}
