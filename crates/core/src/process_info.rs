// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-table snapshot data model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Running,
    Sleeping,
    Stopped,
    Zombie,
    Unknown,
}

/// A snapshot of one process-table entry, as returned by the
/// platform process probe (`/proc/<pid>` on Linux).
///
/// Invariant: `pid >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub command_line: Vec<String>,
    pub start_time_ms: u64,
    pub status: ProcessStatus,
    pub cpu_percent: Option<f64>,
    pub memory_bytes: Option<u64>,
    pub user: Option<String>,
    pub cwd: Option<String>,
}

impl ProcessInfo {
    /// Panics (debug_assert) if constructed with pid 0; pid 0 never
    /// occurs on a real process table and signals a caller bug.
    pub fn new(pid: u32, name: impl Into<String>, status: ProcessStatus) -> Self {
        debug_assert!(pid >= 1, "ProcessInfo requires pid >= 1");
        Self {
            pid,
            name: name.into(),
            command_line: Vec::new(),
            start_time_ms: 0,
            status,
            cpu_percent: None,
            memory_bytes: None,
            user: None,
            cwd: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        !matches!(self.status, ProcessStatus::Zombie)
    }
}

#[cfg(test)]
#[path = "process_info_tests.rs"]
mod tests;
