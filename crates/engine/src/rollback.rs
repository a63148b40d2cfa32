// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compensation registry for the error/recovery path (§4.6): each
//! recoverable step registers an undo action before it runs, and the
//! orchestrator unwinds them in reverse registration order when
//! recovery gives up.

use parking_lot::Mutex;
use tracing::{debug, warn};

type Compensation = Box<dyn FnOnce() + Send>;

struct Entry {
    id: String,
    action: Compensation,
}

/// Holds pending compensations in registration order; unwinds
/// newest-first, mirroring a call stack.
#[derive(Default)]
pub struct RollbackRegistry {
    entries: Mutex<Vec<Entry>>,
}

impl RollbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a compensation under `id`. If `id` was already
    /// registered, the previous compensation is discarded.
    pub fn register(&self, id: impl Into<String>, action: impl FnOnce() + Send + 'static) {
        let id = id.into();
        let mut entries = self.entries.lock();
        entries.retain(|e| e.id != id);
        entries.push(Entry { id, action: Box::new(action) });
    }

    /// Runs and removes the compensation registered under `id`, if any.
    pub fn rollback(&self, id: &str) -> bool {
        let entry = {
            let mut entries = self.entries.lock();
            entries.iter().position(|e| e.id == id).map(|idx| entries.remove(idx))
        };
        match entry {
            Some(entry) => {
                debug!(id = %entry.id, "rollback: running compensation");
                (entry.action)();
                true
            }
            None => false,
        }
    }

    /// Runs every registered compensation in reverse registration
    /// order (last registered, first undone), then clears the registry.
    pub fn rollback_all(&self) {
        let entries = std::mem::take(&mut *self.entries.lock());
        if entries.is_empty() {
            return;
        }
        warn!(count = entries.len(), "rollback: unwinding all pending compensations");
        for entry in entries.into_iter().rev() {
            debug!(id = %entry.id, "rollback: running compensation");
            (entry.action)();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
#[path = "rollback_tests.rs"]
mod tests;
