// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State-machine data model. The guarded-transition engine itself
//! (`transition_to`, capped history, actions under the state lock)
//! lives in `mover-status-engine::state_machine`; this module only
//! carries the named states and the persisted snapshot shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    Idle,
    Detecting,
    Monitoring,
    Completing,
    Error,
    Recovering,
    Shutdown,
    Suspended,
}

impl MonitorState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Detecting => "detecting",
            Self::Monitoring => "monitoring",
            Self::Completing => "completing",
            Self::Error => "error",
            Self::Recovering => "recovering",
            Self::Shutdown => "shutdown",
            Self::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar value storable in a state snapshot's context map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// On-disk shape of a persisted state-machine snapshot (§6: "on-disk
/// JSON-like object with fields `current_state`, `previous_state`,
/// `context_data`"). Round-trip through save/load must be lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub current_state: MonitorState,
    pub previous_state: Option<MonitorState>,
    #[serde(default)]
    pub context_data: BTreeMap<String, ContextValue>,
}

impl StateSnapshot {
    pub fn new(current_state: MonitorState) -> Self {
        Self { current_state, previous_state: None, context_data: BTreeMap::new() }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
