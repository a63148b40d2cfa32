// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Circuit-breaker data model, per named component. The open/close
//! transition logic and cooldown timing live in
//! `mover-status-resilience::circuit_breaker`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerStatus {
    Closed,
    Open,
    HalfOpen,
}

/// Per-component breaker state: failure count and last-failure watermark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerState {
    pub status: BreakerStatus,
    pub failure_count: u32,
    pub last_failure_ms: Option<u64>,
}

impl CircuitBreakerState {
    pub fn closed() -> Self {
        Self { status: BreakerStatus::Closed, failure_count: 0, last_failure_ms: None }
    }
}

impl Default for CircuitBreakerState {
    fn default() -> Self {
        Self::closed()
    }
}

#[cfg(test)]
#[path = "circuit_tests.rs"]
mod tests;
