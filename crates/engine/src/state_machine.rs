// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The guarded state machine (§4.5): a fixed transition table, a
//! capped in-memory history, and snapshot persistence through
//! `mover_status_storage`.

use mover_status_core::{ContextValue, MonitorState, StateSnapshot};
use mover_status_storage::{self, SnapshotError};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Maximum number of past transitions retained in memory (§4.5
/// "history is capped; older entries are dropped").
pub const MAX_HISTORY: usize = 64;

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("transition {from} -> {to} is not allowed")]
    NotAllowed { from: MonitorState, to: MonitorState },
    #[error("failed to persist state snapshot: {0}")]
    Persist(#[from] SnapshotError),
}

/// One recorded transition, newest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: MonitorState,
    pub to: MonitorState,
    pub timestamp_ms: u64,
}

/// Whether `to` is a legal successor of `from`, per the fixed table in
/// §4.5. `Shutdown` is reachable from any state (operator-requested
/// stop always wins); every other edge is explicit.
fn is_allowed(from: MonitorState, to: MonitorState) -> bool {
    use MonitorState::*;
    if to == Shutdown {
        return from != Shutdown;
    }
    matches!(
        (from, to),
        (Idle, Detecting)
            | (Detecting, Monitoring)
            | (Detecting, Idle)
            | (Monitoring, Detecting)
            | (Monitoring, Completing)
            | (Monitoring, Error)
            | (Monitoring, Suspended)
            | (Completing, Idle)
            | (Error, Recovering)
            | (Error, Shutdown)
            | (Recovering, Monitoring)
            | (Recovering, Error)
            | (Suspended, Monitoring)
            | (Suspended, Idle)
    )
}

struct Inner {
    current: MonitorState,
    previous: Option<MonitorState>,
    context: BTreeMap<String, ContextValue>,
    history: VecDeque<Transition>,
}

/// Thread-safe state machine guarded by a single mutex (§5 "state
/// machine transitions are serialized behind one mutex; no transition
/// runs concurrently with another").
pub struct StateMachine {
    inner: Mutex<Inner>,
    snapshot_path: Option<PathBuf>,
}

impl StateMachine {
    pub fn new(initial: MonitorState) -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: initial,
                previous: None,
                context: BTreeMap::new(),
                history: VecDeque::new(),
            }),
            snapshot_path: None,
        }
    }

    /// Attaches a snapshot path; `save()`/`restore()` become effective.
    pub fn with_snapshot_path(mut self, path: PathBuf) -> Self {
        self.snapshot_path = Some(path);
        self
    }

    /// Loads a persisted snapshot and adopts it as the current state.
    /// A missing file or absent path is a no-op, never an error.
    pub fn restore(&self) -> Result<(), TransitionError> {
        let Some(path) = &self.snapshot_path else { return Ok(()) };
        let Some(snapshot) = mover_status_storage::load(path)? else {
            debug!("state_machine: no snapshot to restore, starting idle");
            return Ok(());
        };
        let mut inner = self.inner.lock();
        inner.current = snapshot.current_state;
        inner.previous = snapshot.previous_state;
        inner.context = snapshot.context_data;
        Ok(())
    }

    pub fn current(&self) -> MonitorState {
        self.inner.lock().current
    }

    pub fn context(&self, key: &str) -> Option<ContextValue> {
        self.inner.lock().context.get(key).cloned()
    }

    pub fn set_context(&self, key: impl Into<String>, value: ContextValue) {
        self.inner.lock().context.insert(key.into(), value);
    }

    /// Returns the most recent `limit` transitions, oldest first.
    pub fn history(&self, limit: usize) -> Vec<Transition> {
        let inner = self.inner.lock();
        inner.history.iter().rev().take(limit).rev().copied().collect()
    }

    /// Attempts the transition `current -> to`, recording history and
    /// persisting a snapshot on success. Rejects the transition (and
    /// leaves state untouched) if the table forbids the edge.
    pub fn transition_to(&self, to: MonitorState, timestamp_ms: u64) -> Result<MonitorState, TransitionError> {
        let from = {
            let mut inner = self.inner.lock();
            let from = inner.current;
            if !is_allowed(from, to) {
                return Err(TransitionError::NotAllowed { from, to });
            }
            inner.previous = Some(from);
            inner.current = to;
            inner.history.push_back(Transition { from, to, timestamp_ms });
            while inner.history.len() > MAX_HISTORY {
                inner.history.pop_front();
            }
            from
        };

        if let Some(path) = &self.snapshot_path {
            let snapshot = {
                let inner = self.inner.lock();
                StateSnapshot {
                    current_state: inner.current,
                    previous_state: inner.previous,
                    context_data: inner.context.clone(),
                }
            };
            if let Err(err) = mover_status_storage::save(path, &snapshot) {
                warn!(error = %err, "state_machine: failed to persist snapshot");
                return Err(err.into());
            }
        }

        debug!(from = %from, to = %to, "state transition");
        Ok(from)
    }
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
