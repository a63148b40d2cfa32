// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic save/load of the state machine's `StateSnapshot` (§6).
//! An absent file is a no-op on load, matching "restoration rebuilds
//! those fields; absent file => no-op".

use mover_status_core::StateSnapshot;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes `snapshot` to `path` via a temp-file-then-rename so a crash
/// mid-write never leaves a partially-written snapshot behind.
pub fn save(path: &Path, snapshot: &StateSnapshot) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(snapshot)?;

    let result = (|| -> Result<(), SnapshotError> {
        let mut opts = OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt as _;
            opts.mode(0o644);
        }
        let mut file = opts.open(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Loads the snapshot at `path`. Returns `Ok(None)` if the file does
/// not exist rather than an error.
pub fn load(path: &Path) -> Result<Option<StateSnapshot>, SnapshotError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "snapshot: no existing file, starting fresh");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
