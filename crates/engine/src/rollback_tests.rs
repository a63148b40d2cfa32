// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn rollback_runs_registered_compensation() {
    let registry = RollbackRegistry::new();
    let ran = Arc::new(AtomicUsize::new(0));
    let ran2 = ran.clone();
    registry.register("a", move || {
        ran2.fetch_add(1, Ordering::SeqCst);
    });
    assert!(registry.rollback("a"));
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert!(registry.is_empty());
}

#[test]
fn rollback_unknown_id_is_a_no_op() {
    let registry = RollbackRegistry::new();
    assert!(!registry.rollback("missing"));
}

#[test]
fn rollback_all_runs_in_reverse_registration_order() {
    let registry = RollbackRegistry::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    for id in ["a", "b", "c"] {
        let order = order.clone();
        registry.register(id, move || order.lock().push(id.to_string()));
    }
    registry.rollback_all();
    assert_eq!(*order.lock(), vec!["c", "b", "a"]);
    assert!(registry.is_empty());
}

#[test]
fn re_registering_same_id_discards_the_previous_compensation() {
    let registry = RollbackRegistry::new();
    let ran = Arc::new(AtomicUsize::new(0));
    let first = ran.clone();
    registry.register("a", move || {
        first.fetch_add(100, Ordering::SeqCst);
    });
    let second = ran.clone();
    registry.register("a", move || {
        second.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(registry.len(), 1);
    registry.rollback_all();
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}
