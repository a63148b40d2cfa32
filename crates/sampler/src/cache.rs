// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TTL-memoized wrapper over [`crate::disk::sample_async`].
//!
//! Keyed by the tuple (sorted paths, sorted exclusions); entries past
//! the TTL (default 30s) are evicted lazily, on the next access that
//! would have hit them. Baseline samples bypass this cache entirely —
//! callers that want an uncached sample call [`crate::disk::sample_async`]
//! directly; baseline and "current" share identical walk semantics and
//! differ only in that intent.

use crate::disk::sample_async;
use mover_status_core::{Clock, CorrelationId, DiskSample};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    paths: Vec<String>,
    exclusions: Vec<String>,
}

impl CacheKey {
    pub fn new(paths: &[PathBuf], exclusions: &[PathBuf]) -> Self {
        let mut paths: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        paths.sort();
        let mut exclusions: Vec<String> = exclusions.iter().map(|p| p.display().to_string()).collect();
        exclusions.sort();
        Self { paths, exclusions }
    }
}

struct Cached {
    sample: DiskSample,
    inserted_at: std::time::Instant,
}

/// TTL-memoized disk sampler. One instance owns its cache map; the
/// sampler's contract (§3 ownership) is that nobody else reaches in.
pub struct SampleCache<C: Clock> {
    clock: C,
    ttl: Duration,
    entries: Arc<Mutex<HashMap<CacheKey, Cached>>>,
}

impl<C: Clock> SampleCache<C> {
    pub fn new(clock: C) -> Self {
        Self::with_ttl(clock, DEFAULT_TTL)
    }

    pub fn with_ttl(clock: C, ttl: Duration) -> Self {
        Self { clock, ttl, entries: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Returns the cached sample for (paths, exclusions) if present and
    /// within TTL; otherwise samples fresh, offloaded to the blocking
    /// pool, and caches the result.
    pub async fn sample(
        &self,
        paths: Vec<PathBuf>,
        exclusions: Vec<PathBuf>,
        correlation: CorrelationId,
    ) -> DiskSample {
        let key = CacheKey::new(&paths, &exclusions);
        if let Some(sample) = self.fresh(&key) {
            return sample;
        }
        let sample = sample_async(paths, exclusions, correlation, self.clock.clone()).await;
        self.entries.lock().insert(key, Cached { sample: sample.clone(), inserted_at: self.clock.now() });
        sample
    }

    fn fresh(&self, key: &CacheKey) -> Option<DiskSample> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(cached) if self.clock.now().duration_since(cached.inserted_at) < self.ttl => {
                Some(cached.sample.clone())
            }
            Some(_) => {
                // Lazily evict the stale entry.
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
