// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Disk-usage sample data model.

use serde::{Deserialize, Serialize};

/// A point-in-time measurement of directory-tree byte usage.
///
/// Immutable once produced; the sampler never mutates a `DiskSample`
/// after returning it, and the estimator holds the latest plus a
/// bounded history of prior samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSample {
    pub timestamp_ms: u64,
    pub bytes_used: u64,
    /// Human-readable description of the path set sampled, e.g. a
    /// comma-joined sorted list, for logging and cache-key display.
    pub path_description: String,
}

impl DiskSample {
    pub fn new(timestamp_ms: u64, bytes_used: u64, path_description: impl Into<String>) -> Self {
        Self { timestamp_ms, bytes_used, path_description: path_description.into() }
    }
}

#[cfg(test)]
#[path = "sample_tests.rs"]
mod tests;
