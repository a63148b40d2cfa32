// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-component circuit breaker (§4.6): three-state guard
//! (closed/open/half-open) over [`mover_status_core::CircuitBreakerState`].

use mover_status_core::{BreakerStatus, CircuitBreakerState};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreakerRejection {
    #[error("circuit breaker open for component {0:?}")]
    Open(String),
}

/// A single named component's breaker, guarding calls behind a
/// failure-count threshold and a cooldown.
pub struct CircuitBreaker {
    threshold: u32,
    cooldown: Duration,
    state: Mutex<CircuitBreakerState>,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self { threshold, cooldown, state: Mutex::new(CircuitBreakerState::closed()) }
    }

    /// Call before attempting the guarded operation. `Ok(())` permits
    /// the call (including the single half-open probe); `Err` rejects it.
    pub fn check(&self, now_ms: u64, component: &str) -> Result<(), BreakerRejection> {
        let mut state = self.state.lock();
        if state.status == BreakerStatus::Open {
            let last_failure = state.last_failure_ms.unwrap_or(0);
            if now_ms.saturating_sub(last_failure) >= self.cooldown.as_millis() as u64 {
                state.status = BreakerStatus::HalfOpen;
            } else {
                return Err(BreakerRejection::Open(component.to_string()));
            }
        }
        Ok(())
    }

    /// Records success: closes the breaker (whether it was closed
    /// already or probing half-open) and resets the failure count.
    pub fn record_success(&self) {
        let mut state = self.state.lock();
        state.status = BreakerStatus::Closed;
        state.failure_count = 0;
    }

    /// Records failure: increments the count and opens the breaker
    /// once the threshold is reached, or immediately reopens from
    /// half-open (a failed probe never stays half-open).
    pub fn record_failure(&self, now_ms: u64) {
        let mut state = self.state.lock();
        state.failure_count += 1;
        state.last_failure_ms = Some(now_ms);
        if state.status == BreakerStatus::HalfOpen || state.failure_count >= self.threshold {
            state.status = BreakerStatus::Open;
        }
    }

    pub fn status(&self) -> BreakerStatus {
        self.state.lock().status
    }

    pub fn snapshot(&self) -> CircuitBreakerState {
        *self.state.lock()
    }
}

/// A table of named breakers, one per component, sharing the same
/// threshold/cooldown policy.
pub struct BreakerRegistry {
    threshold: u32,
    cooldown: Duration,
    breakers: Mutex<HashMap<String, std::sync::Arc<CircuitBreaker>>>,
}

impl BreakerRegistry {
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self { threshold, cooldown, breakers: Mutex::new(HashMap::new()) }
    }

    pub fn get(&self, component: &str) -> std::sync::Arc<CircuitBreaker> {
        let mut breakers = self.breakers.lock();
        breakers
            .entry(component.to_string())
            .or_insert_with(|| std::sync::Arc::new(CircuitBreaker::new(self.threshold, self.cooldown)))
            .clone()
    }
}

#[cfg(test)]
#[path = "circuit_breaker_tests.rs"]
mod tests;
