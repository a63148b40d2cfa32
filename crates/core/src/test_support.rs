// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{DiskSample, Message, MonitorState, Priority, ProgressMetrics};

/// Proptest strategies for core data-model types.
pub mod strategies {
    use crate::{MonitorState, Priority};
    use proptest::prelude::*;

    pub fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![Just(Priority::Low), Just(Priority::Normal), Just(Priority::High), Just(Priority::Urgent)]
    }

    pub fn arb_monitor_state() -> impl Strategy<Value = MonitorState> {
        prop_oneof![
            Just(MonitorState::Idle),
            Just(MonitorState::Detecting),
            Just(MonitorState::Monitoring),
            Just(MonitorState::Completing),
            Just(MonitorState::Error),
            Just(MonitorState::Recovering),
            Just(MonitorState::Shutdown),
            Just(MonitorState::Suspended),
        ]
    }

    /// Valid (bytes_transferred, total_bytes) pairs, total_bytes >= 1.
    pub fn arb_progress_pair() -> impl Strategy<Value = (u64, u64)> {
        (1u64..=1_000_000u64).prop_flat_map(|total| (0u64..=total * 2, Just(total)))
    }
}

pub fn sample(timestamp_ms: u64, bytes_used: u64) -> DiskSample {
    DiskSample::new(timestamp_ms, bytes_used, "/test/paths")
}

pub fn message(title: &str) -> Message {
    Message::builder(title, "test content").priority(Priority::Normal).build()
}

pub fn message_with_priority(title: &str, priority: Priority) -> Message {
    Message::builder(title, "test content").priority(priority).build()
}

pub fn complete_progress() -> ProgressMetrics {
    ProgressMetrics::complete(1000, 1000)
}

pub fn in_progress(bytes_transferred: u64, total_bytes: u64) -> ProgressMetrics {
    ProgressMetrics {
        percent: (bytes_transferred as f64 / total_bytes as f64) * 100.0,
        bytes_transferred,
        total_bytes,
        transfer_rate_bps: 0.0,
        etc_seconds: 0.0,
        confidence: 0.0,
    }
}

pub fn state_pair(current: MonitorState, previous: MonitorState) -> (MonitorState, MonitorState) {
    (current, previous)
}
