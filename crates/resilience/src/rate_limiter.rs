// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scoped token-bucket rate limiter with a rolling hourly quota (§4.8).
//!
//! Buckets are keyed by an opaque scope string (global / per-chat /
//! per-group, at the caller's discretion); the hourly quota is a
//! single counter shared across all scopes in one limiter instance.

use mover_status_core::TokenBucket;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

pub const HOUR_MS: u64 = 3_600_000;

struct Quota {
    limit: u32,
    window_start_ms: u64,
    count: u32,
}

impl Quota {
    fn consume(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.window_start_ms) >= HOUR_MS {
            self.window_start_ms = now_ms;
            self.count = 0;
        }
        if self.count < self.limit {
            self.count += 1;
            true
        } else {
            false
        }
    }

    fn wait_seconds(&self, now_ms: u64) -> f64 {
        if self.count < self.limit {
            return 0.0;
        }
        let elapsed = now_ms.saturating_sub(self.window_start_ms);
        ((HOUR_MS.saturating_sub(elapsed)) as f64 / 1000.0).max(0.0)
    }
}

/// Token-bucket-per-scope rate limiter with an overall rolling hourly quota.
pub struct RateLimiter {
    capacity: f64,
    refill_rate: f64,
    buckets: Mutex<HashMap<String, TokenBucket>>,
    quota: Mutex<Quota>,
}

impl RateLimiter {
    pub fn new(capacity: f64, refill_rate: f64, hourly_quota: u32) -> Self {
        Self {
            capacity,
            refill_rate,
            buckets: Mutex::new(HashMap::new()),
            quota: Mutex::new(Quota { limit: hourly_quota, window_start_ms: 0, count: 0 }),
        }
    }

    /// Attempts to consume `n` tokens from `scope`'s bucket and the
    /// shared hourly quota. Returns the number of seconds the caller
    /// should wait before consumption would succeed; `0.0` means the
    /// tokens were consumed immediately.
    pub fn acquire(&self, scope: &str, n: f64, now_ms: u64) -> f64 {
        let mut buckets = self.buckets.lock();
        let bucket = buckets.entry(scope.to_string()).or_insert_with(|| TokenBucket::new(self.capacity, self.refill_rate, now_ms));
        bucket.refill(now_ms);

        let mut quota = self.quota.lock();
        let bucket_wait = bucket.wait_seconds(n);
        let quota_wait = quota.wait_seconds(now_ms);
        let wait = bucket_wait.max(quota_wait);
        if wait > 0.0 {
            return wait;
        }
        bucket.try_consume(n, now_ms);
        quota.consume(now_ms);
        0.0
    }

    /// Same as [`Self::acquire`] but actually sleeps out the wait
    /// before returning, matching §4.8's "else ... sleep that long,
    /// then consume".
    pub async fn acquire_blocking<C: mover_status_core::Clock>(&self, scope: &str, n: f64, clock: &C) {
        loop {
            let now_ms = clock.epoch_ms();
            let wait = self.acquire(scope, n, now_ms);
            if wait <= 0.0 {
                return;
            }
            tokio::time::sleep(Duration::from_secs_f64(wait)).await;
        }
    }
}

#[cfg(test)]
#[path = "rate_limiter_tests.rs"]
mod tests;
