// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::error_record::{ErrorCategory, ErrorRecord, ErrorSeverity};

#[test]
fn topic_matches_event_variant() {
    let event = MonitorEvent::ProgressUpdated { metrics: ProgressMetrics::complete(10, 10), timestamp_ms: 5 };
    assert_eq!(event.topic(), "progress.updated");
    assert_eq!(event.timestamp_ms(), 5);
}

#[test]
fn error_event_reuses_record_timestamp() {
    let record = ErrorRecord::new(ErrorCategory::Permission, ErrorSeverity::High, "denied", "ctx", 42);
    let event = MonitorEvent::ErrorOccurred { record };
    assert_eq!(event.topic(), "error.occurred");
    assert_eq!(event.timestamp_ms(), 42);
}

#[test]
fn lifecycle_topics_are_distinct() {
    let started = MonitorEvent::MoverStarted { pid: 1, timestamp_ms: 0 };
    let stopped = MonitorEvent::MoverStopped { timestamp_ms: 0 };
    let completed = MonitorEvent::TransferCompleted { timestamp_ms: 0 };
    assert_ne!(started.topic(), stopped.topic());
    assert_ne!(stopped.topic(), completed.topic());
}
