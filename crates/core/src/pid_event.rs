// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PID-file lifecycle event data model, produced by the watcher and
//! consumed by the orchestrator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PidEventKind {
    Created,
    Modified,
    Deleted,
}

impl PidEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for PidEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single PID-file transition observed by the watcher.
///
/// `pid` is `None` for `Deleted`, and also for `Created` when the file
/// content did not parse to a positive integer (the watcher still
/// emits `Created` in that case; the consumer decides what to do).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PidFileEvent {
    pub kind: PidEventKind,
    pub pid: Option<u32>,
    pub timestamp_ms: u64,
}

impl PidFileEvent {
    pub fn created(pid: Option<u32>, timestamp_ms: u64) -> Self {
        Self { kind: PidEventKind::Created, pid, timestamp_ms }
    }

    pub fn modified(pid: u32, timestamp_ms: u64) -> Self {
        Self { kind: PidEventKind::Modified, pid: Some(pid), timestamp_ms }
    }

    pub fn deleted(timestamp_ms: u64) -> Self {
        Self { kind: PidEventKind::Deleted, pid: None, timestamp_ms }
    }
}

#[cfg(test)]
#[path = "pid_event_tests.rs"]
mod tests;
