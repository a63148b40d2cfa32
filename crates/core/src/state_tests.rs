// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_snapshot_has_no_previous_state() {
    let snap = StateSnapshot::new(MonitorState::Idle);
    assert_eq!(snap.previous_state, None);
    assert!(snap.context_data.is_empty());
}

#[test]
fn snapshot_round_trips_through_json() {
    let mut snap = StateSnapshot::new(MonitorState::Monitoring);
    snap.previous_state = Some(MonitorState::Detecting);
    snap.context_data.insert("pid".into(), ContextValue::Int(123));
    let json = serde_json::to_string(&snap).unwrap();
    let back: StateSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snap, back);
}

#[test]
fn display_matches_table_names() {
    assert_eq!(MonitorState::Detecting.to_string(), "detecting");
    assert_eq!(MonitorState::Suspended.to_string(), "suspended");
}
