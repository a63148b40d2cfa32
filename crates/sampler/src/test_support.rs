// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers shared with downstream crates that exercise the
//! sampler without touching the real filesystem or process table.

use mover_status_core::DiskSample;
use std::path::PathBuf;

/// Builds a [`DiskSample`] with a deterministic path description, for
/// crates that need sampler output without running [`crate::disk::walk_sync`].
pub fn fixed_sample(timestamp_ms: u64, bytes_used: u64) -> DiskSample {
    DiskSample::new(timestamp_ms, bytes_used, "/test/fixed")
}

/// A writable scratch PID-file path under a fresh temp directory, for
/// tests driving [`crate::pid_watcher::PidWatcher`] end to end.
pub fn scratch_pid_path() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mover.pid");
    (dir, path)
}
