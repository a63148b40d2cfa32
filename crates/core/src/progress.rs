// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress metrics data model, produced by `mover-status-progress`'s estimator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("negative input rejected: {0}")]
    NegativeInput(&'static str),
}

/// Computed transfer-progress snapshot.
///
/// Invariants (§8): `0 <= percent <= 100`, `etc_seconds >= 0`,
/// `0 <= confidence <= 1`; when `bytes_transferred >= total_bytes`,
/// `etc_seconds == 0 && confidence == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressMetrics {
    pub percent: f64,
    pub bytes_transferred: u64,
    pub total_bytes: u64,
    pub transfer_rate_bps: f64,
    pub etc_seconds: f64,
    pub confidence: f64,
}

impl ProgressMetrics {
    /// Builds the completed-transfer metrics (§4.3 edge case:
    /// `bytes_transferred >= total_bytes`).
    pub fn complete(bytes_transferred: u64, total_bytes: u64) -> Self {
        Self { percent: 100.0, bytes_transferred, total_bytes, transfer_rate_bps: 0.0, etc_seconds: 0.0, confidence: 1.0 }
    }

    /// True if bytes_transferred has met or exceeded total_bytes.
    pub fn is_complete(&self) -> bool {
        self.total_bytes > 0 && self.bytes_transferred >= self.total_bytes
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
