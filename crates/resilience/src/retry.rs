// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single integrated retry loop (§4.7, §9 "one integrated retry
//! path"). Error classification (§4.6) decides *whether* an operation
//! is worth retrying; this is the *only* backoff loop in the system —
//! it consults an optional circuit breaker and wraps the whole attempt
//! sequence in an optional deadline, but nothing layers another
//! backoff loop outside it.

use crate::circuit_breaker::{BreakerRejection, CircuitBreaker};
use mover_status_core::Clock;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RetryError<E> {
    #[error("operation failed permanently: {0}")]
    Permanent(E),
    #[error("circuit breaker rejected the call: {0}")]
    BreakerOpen(#[from] BreakerRejection),
    #[error("operation timed out")]
    Timeout,
    #[error("retries exhausted after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_backoff: Duration,
    pub jitter: bool,
    pub timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_delay: Duration::from_millis(100), max_backoff: Duration::from_secs(30), jitter: false, timeout: None }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.as_millis().saturating_mul(1u128 << (attempt.saturating_sub(1)));
        let capped = exp.min(self.max_backoff.as_millis());
        Duration::from_millis(capped as u64)
    }
}

/// Returned by the operation closure to tell the retry loop whether
/// the failure is worth retrying, independent of the circuit breaker.
pub trait Retryable {
    fn is_permanent(&self) -> bool;
}

/// Runs `op` under `policy`, retrying transient failures with
/// exponential backoff (+ optional uniform jitter up to half the
/// delay), consulting `breaker` before every attempt, and bounding the
/// whole sequence by `policy.timeout` if set.
pub async fn execute<C, F, Fut, T, E>(clock: &C, policy: RetryPolicy, breaker: Option<&CircuitBreaker>, mut op: F) -> Result<T, RetryError<E>>
where
    C: Clock,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let deadline = policy.timeout.map(|t| clock.now() + t);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        if let Some(deadline) = deadline {
            if clock.now() >= deadline {
                return Err(RetryError::Timeout);
            }
        }
        if let Some(breaker) = breaker {
            breaker.check(clock.epoch_ms(), "retry")?;
        }

        let run = op();
        let result = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(clock.now());
                match tokio::time::timeout(remaining, run).await {
                    Ok(result) => result,
                    Err(_) => {
                        if let Some(breaker) = breaker {
                            breaker.record_failure(clock.epoch_ms());
                        }
                        return Err(RetryError::Timeout);
                    }
                }
            }
            None => run.await,
        };

        match result {
            Ok(value) => {
                if let Some(breaker) = breaker {
                    breaker.record_success();
                }
                return Ok(value);
            }
            Err(err) => {
                if let Some(breaker) = breaker {
                    breaker.record_failure(clock.epoch_ms());
                }
                if err.is_permanent() {
                    return Err(RetryError::Permanent(err));
                }
                if attempt >= policy.max_attempts {
                    return Err(RetryError::Exhausted { attempts: attempt, last: err });
                }
                let mut delay = policy.backoff(attempt);
                if policy.jitter {
                    let jitter_ms = rand::thread_rng().gen_range(0..=(delay.as_millis() as u64 / 2).max(1));
                    delay += Duration::from_millis(jitter_ms);
                }
                debug!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "retry: backing off");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

pub fn breaker_registry() -> Arc<crate::circuit_breaker::BreakerRegistry> {
    Arc::new(crate::circuit_breaker::BreakerRegistry::new(5, Duration::from_secs(30)))
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
