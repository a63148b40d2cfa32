// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The unified event enum the orchestrator publishes on its
//! [`crate::EventBus`] (§4.11, §4.12), covering lifecycle, progress,
//! and error events the notification bridge matches rules against.

use crate::error_record::ErrorRecord;
use crate::progress::ProgressMetrics;
use crate::state::MonitorState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MonitorEvent {
    StateTransitioned { from: MonitorState, to: MonitorState, timestamp_ms: u64 },
    ProgressUpdated { metrics: ProgressMetrics, timestamp_ms: u64 },
    ErrorOccurred { record: ErrorRecord },
    TransferCompleted { timestamp_ms: u64 },
    MoverStarted { pid: u32, timestamp_ms: u64 },
    MoverStopped { timestamp_ms: u64 },
}

impl MonitorEvent {
    /// Topic string matched against bridge rule patterns, e.g.
    /// `"progress.*"` or `"error.occurred"`.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::StateTransitioned { .. } => "state.transitioned",
            Self::ProgressUpdated { .. } => "progress.updated",
            Self::ErrorOccurred { .. } => "error.occurred",
            Self::TransferCompleted { .. } => "lifecycle.completed",
            Self::MoverStarted { .. } => "lifecycle.started",
            Self::MoverStopped { .. } => "lifecycle.stopped",
        }
    }

    pub fn timestamp_ms(&self) -> u64 {
        match self {
            Self::StateTransitioned { timestamp_ms, .. }
            | Self::ProgressUpdated { timestamp_ms, .. }
            | Self::TransferCompleted { timestamp_ms }
            | Self::MoverStarted { timestamp_ms, .. }
            | Self::MoverStopped { timestamp_ms } => *timestamp_ms,
            Self::ErrorOccurred { record } => record.timestamp_ms,
        }
    }
}

#[cfg(test)]
#[path = "monitor_event_tests.rs"]
mod tests;
