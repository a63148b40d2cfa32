// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mover_status_core::MonitorState;
use tempfile::tempdir;
use yare::parameterized;

#[test]
fn starts_in_given_state() {
    let sm = StateMachine::new(MonitorState::Idle);
    assert_eq!(sm.current(), MonitorState::Idle);
}

#[parameterized(
    idle_to_detecting = { MonitorState::Idle, MonitorState::Detecting, true },
    detecting_to_monitoring = { MonitorState::Detecting, MonitorState::Monitoring, true },
    detecting_to_idle = { MonitorState::Detecting, MonitorState::Idle, true },
    monitoring_to_completing = { MonitorState::Monitoring, MonitorState::Completing, true },
    monitoring_to_error = { MonitorState::Monitoring, MonitorState::Error, true },
    error_to_recovering = { MonitorState::Error, MonitorState::Recovering, true },
    recovering_to_monitoring = { MonitorState::Recovering, MonitorState::Monitoring, true },
    any_to_shutdown = { MonitorState::Monitoring, MonitorState::Shutdown, true },
    idle_to_completing_is_illegal = { MonitorState::Idle, MonitorState::Completing, false },
    idle_to_monitoring_is_illegal = { MonitorState::Idle, MonitorState::Monitoring, false },
    shutdown_to_anything_is_illegal = { MonitorState::Shutdown, MonitorState::Idle, false },
)]
fn transition_legality(from: MonitorState, to: MonitorState, allowed: bool) {
    let sm = StateMachine::new(from);
    let result = sm.transition_to(to, 1_000);
    assert_eq!(result.is_ok(), allowed);
    if allowed {
        assert_eq!(sm.current(), to);
    } else {
        assert_eq!(sm.current(), from);
    }
}

#[test]
fn rejected_transition_leaves_history_untouched() {
    let sm = StateMachine::new(MonitorState::Idle);
    let _ = sm.transition_to(MonitorState::Monitoring, 1_000);
    assert!(sm.history(10).is_empty());
}

#[test]
fn history_caps_at_max_entries() {
    let sm = StateMachine::new(MonitorState::Idle);
    for i in 0..(MAX_HISTORY + 10) {
        let target = if sm.current() == MonitorState::Idle { MonitorState::Detecting } else { MonitorState::Idle };
        sm.transition_to(target, i as u64).unwrap();
    }
    assert_eq!(sm.history(1_000).len(), MAX_HISTORY);
}

#[test]
fn context_round_trips() {
    let sm = StateMachine::new(MonitorState::Idle);
    sm.set_context("pid", ContextValue::Int(42));
    assert_eq!(sm.context("pid"), Some(ContextValue::Int(42)));
    assert_eq!(sm.context("missing"), None);
}

#[test]
fn transition_persists_and_restores_snapshot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let sm = StateMachine::new(MonitorState::Idle).with_snapshot_path(path.clone());
    sm.set_context("pid", ContextValue::Int(7));
    sm.transition_to(MonitorState::Detecting, 10).unwrap();

    let restored = StateMachine::new(MonitorState::Idle).with_snapshot_path(path);
    restored.restore().unwrap();
    assert_eq!(restored.current(), MonitorState::Detecting);
    assert_eq!(restored.context("pid"), Some(ContextValue::Int(7)));
}

#[test]
fn restore_without_snapshot_file_is_a_no_op() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let sm = StateMachine::new(MonitorState::Idle).with_snapshot_path(path);
    sm.restore().unwrap();
    assert_eq!(sm.current(), MonitorState::Idle);
}
