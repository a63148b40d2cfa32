// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn critical_severity_always_escalates() {
    let tracker = EscalationTracker::new(3, 60_000);
    assert!(tracker.record(ErrorCategory::Network, ErrorSeverity::Critical, "ctx", 0));
}

#[test]
fn escalates_once_threshold_reached_within_window() {
    let tracker = EscalationTracker::new(3, 60_000);
    assert!(!tracker.record(ErrorCategory::Network, ErrorSeverity::Medium, "ctx", 0));
    assert!(!tracker.record(ErrorCategory::Network, ErrorSeverity::Medium, "ctx", 10));
    assert!(tracker.record(ErrorCategory::Network, ErrorSeverity::Medium, "ctx", 20));
}

#[test]
fn entries_outside_window_do_not_count() {
    let tracker = EscalationTracker::new(2, 100);
    assert!(!tracker.record(ErrorCategory::Timeout, ErrorSeverity::Medium, "ctx", 0));
    assert!(!tracker.record(ErrorCategory::Timeout, ErrorSeverity::Medium, "ctx", 500));
    assert_eq!(tracker.count(ErrorCategory::Timeout, "ctx", 500), 1);
}

#[test]
fn different_contexts_track_independently() {
    let tracker = EscalationTracker::new(2, 60_000);
    assert!(!tracker.record(ErrorCategory::Network, ErrorSeverity::Medium, "a", 0));
    assert!(!tracker.record(ErrorCategory::Network, ErrorSeverity::Medium, "b", 0));
    assert_eq!(tracker.count(ErrorCategory::Network, "a", 0), 1);
    assert_eq!(tracker.count(ErrorCategory::Network, "b", 0), 1);
}
