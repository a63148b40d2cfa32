// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive directory-size walker.
//!
//! Never raises out of the public API: per-entry errors (permission
//! denied, a file vanishing mid-walk) are logged and skipped; a
//! top-level path that cannot be opened at all is logged and simply
//! contributes nothing, so the total degrades toward the accessible
//! subset instead of failing the whole sample.

use mover_status_core::{Clock, CorrelationId, DiskSample};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Walks every path in `paths`, summing the size of every regular file
/// not under any entry of `exclusions`. Symlinks are never followed.
pub fn walk_sync(paths: &[PathBuf], exclusions: &[PathBuf], now_ms: u64) -> DiskSample {
    let mut total = 0u64;
    for root in paths {
        total = total.saturating_add(walk_one(root, exclusions));
    }
    DiskSample::new(now_ms, total, describe(paths))
}

fn describe(paths: &[PathBuf]) -> String {
    let mut sorted: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    sorted.sort();
    sorted.join(",")
}

fn is_excluded(path: &Path, exclusions: &[PathBuf]) -> bool {
    exclusions.iter().any(|excl| path == excl || path.starts_with(excl))
}

fn walk_one(root: &Path, exclusions: &[PathBuf]) -> u64 {
    if is_excluded(root, exclusions) {
        return 0;
    }
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %root.display(), error = %err, "disk sampler: cannot open top-level path");
            return 0;
        }
    };

    let mut total = 0u64;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = %root.display(), error = %err, "disk sampler: skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        if is_excluded(&path, exclusions) {
            continue;
        }
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "disk sampler: skipping entry, cannot stat");
                continue;
            }
        };
        if file_type.is_symlink() {
            continue;
        } else if file_type.is_dir() {
            total = total.saturating_add(walk_one(&path, exclusions));
        } else if file_type.is_file() {
            match entry.metadata() {
                Ok(meta) => total = total.saturating_add(meta.len()),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "disk sampler: skipping entry, metadata unavailable");
                }
            }
        }
    }
    total
}

/// Offloads [`walk_sync`] onto the blocking thread pool so the event
/// loop is never blocked by filesystem traversal, preserving the
/// active correlation id for the resulting log records.
///
/// Baseline and "current" samples share this function; they differ
/// only in caller intent (the cache wrapper is what distinguishes
/// "baseline, never cached" from "current, TTL-cached").
pub async fn sample_async<C: Clock>(
    paths: Vec<PathBuf>,
    exclusions: Vec<PathBuf>,
    correlation: CorrelationId,
    clock: C,
) -> DiskSample {
    let now_ms = clock.epoch_ms();
    match tokio::task::spawn_blocking(move || walk_sync(&paths, &exclusions, now_ms)).await {
        Ok(sample) => sample,
        Err(join_err) => {
            warn!(%correlation, error = %join_err, "disk sampler: worker task failed, returning empty sample");
            DiskSample::new(now_ms, 0, "")
        }
    }
}

#[cfg(test)]
#[path = "disk_tests.rs"]
mod tests;
