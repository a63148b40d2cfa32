// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded priority dispatcher (§4.10): a priority queue, a fixed
//! worker pool, per-provider retry via [`mover_status_resilience::retry`],
//! throttling, deduplication, escalation timers, and a phased `stop()`.
//!
//! The queue/worker-pool plumbing follows the channel +
//! `CancellationToken` idiom used by `mover_status_sampler::pid_watcher`;
//! shutdown phasing (stop accepting, drain, then cancel) follows the
//! teacher's runtime shutdown ordering.

use crate::provider::{Provider, ProviderError};
use mover_status_core::{Clock, DeliveryOutcome, Message, Priority, ProviderResult, QueuedMessage};
use mover_status_resilience::{BreakerRegistry, RateLimiter, RetryError, RetryPolicy, Retryable};
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error("dispatcher is not accepting new messages")]
    NotRunning,
    #[error("enqueue timed out waiting for queue capacity")]
    EnqueueTimeout,
}

/// Non-error outcomes of submitting a message: throttling and
/// deduplication are expected control flow, not failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Enqueued(Uuid),
    Throttled,
    Duplicate,
}

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub grace_period: Duration,
    /// Minimum interval between dispatches sharing a throttle key.
    /// Disabled when zero.
    pub throttle_interval: Duration,
    pub dedup_ttl: Duration,
    pub dedup_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            queue_capacity: 256,
            grace_period: Duration::from_secs(10),
            throttle_interval: Duration::ZERO,
            dedup_ttl: Duration::from_secs(300),
            dedup_capacity: 1024,
        }
    }
}

/// Distinguishes a transient provider failure (worth retrying) from a
/// misconfigured provider (never worth retrying), for the retry
/// helper's [`Retryable`] contract.
#[derive(Debug, Error)]
enum SendError {
    #[error("provider reported failure")]
    Reported,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl Retryable for SendError {
    fn is_permanent(&self) -> bool {
        matches!(self, SendError::Provider(ProviderError::InvalidConfig(_)))
    }
}

struct Entry {
    weight: u8,
    seq: u64,
    item: QueuedMessage,
    _permit: OwnedSemaphorePermit,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Higher priority first; lower `seq` (older) first within a priority,
/// matching BinaryHeap's max-heap pop order to the spec's
/// "priority, FIFO within priority".
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight.cmp(&other.weight).then_with(|| other.seq.cmp(&self.seq))
    }
}

struct Inner<C: Clock> {
    providers: HashMap<String, Arc<dyn Provider>>,
    queue: Mutex<BinaryHeap<Entry>>,
    capacity: Arc<Semaphore>,
    not_empty: Notify,
    running: AtomicBool,
    cancel: CancellationToken,
    config: DispatcherConfig,
    retry_policy: RetryPolicy,
    rate_limiter: Option<Arc<RateLimiter>>,
    breakers: Arc<BreakerRegistry>,
    clock: C,
    seq: AtomicU64,
    throttle: Mutex<HashMap<String, u64>>,
    dedup: Mutex<HashMap<(String, String, Priority), u64>>,
    escalations: Mutex<HashMap<String, JoinHandle<()>>>,
    outcomes: Mutex<HashMap<Uuid, DeliveryOutcome>>,
}

/// Drives messages from enqueue to provider delivery. Cheap to share:
/// wrap in `Arc` to hand clones to the bridge and orchestrator.
pub struct Dispatcher<C: Clock> {
    inner: Arc<Inner<C>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl<C: Clock> Dispatcher<C> {
    pub fn new(
        providers: HashMap<String, Arc<dyn Provider>>,
        config: DispatcherConfig,
        retry_policy: RetryPolicy,
        rate_limiter: Option<Arc<RateLimiter>>,
        breakers: Arc<BreakerRegistry>,
        clock: C,
    ) -> Self {
        let inner = Arc::new(Inner {
            providers,
            queue: Mutex::new(BinaryHeap::new()),
            capacity: Arc::new(Semaphore::new(config.queue_capacity)),
            not_empty: Notify::new(),
            running: AtomicBool::new(true),
            cancel: CancellationToken::new(),
            retry_policy,
            rate_limiter,
            breakers,
            clock,
            seq: AtomicU64::new(0),
            throttle: Mutex::new(HashMap::new()),
            dedup: Mutex::new(HashMap::new()),
            escalations: Mutex::new(HashMap::new()),
            outcomes: Mutex::new(HashMap::new()),
            config,
        });
        let workers = (0..inner.config.worker_count)
            .map(|_| {
                let inner = inner.clone();
                tokio::spawn(async move { worker_loop(inner).await })
            })
            .collect();
        Self { inner, workers: Mutex::new(workers) }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(AtomicOrdering::Acquire)
    }

    /// Submits `message` to the given providers. `key`, when set,
    /// applies the throttle window; `timeout` bounds how long to wait
    /// for queue capacity (`None` waits indefinitely).
    pub async fn enqueue(
        &self,
        message: Message,
        providers: Vec<String>,
        key: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<DispatchOutcome, DispatcherError> {
        if !self.is_running() {
            return Err(DispatcherError::NotRunning);
        }
        let now_ms = self.inner.clock.epoch_ms();

        if let Some(key) = key {
            if !self.inner.config.throttle_interval.is_zero() {
                let mut throttle = self.inner.throttle.lock();
                if let Some(&last) = throttle.get(key) {
                    if now_ms.saturating_sub(last) < self.inner.config.throttle_interval.as_millis() as u64 {
                        return Ok(DispatchOutcome::Throttled);
                    }
                }
                throttle.insert(key.to_string(), now_ms);
            }
        }

        let dedup_key = message.dedup_key();
        {
            let mut dedup = self.inner.dedup.lock();
            dedup.retain(|_, expires_at_ms| *expires_at_ms > now_ms);
            if dedup.contains_key(&dedup_key) {
                return Ok(DispatchOutcome::Duplicate);
            }
            if dedup.len() < self.inner.config.dedup_capacity {
                dedup.insert(dedup_key, now_ms + self.inner.config.dedup_ttl.as_millis() as u64);
            } else {
                warn!("dispatcher: dedup set at capacity, skipping tracking for this message");
            }
        }

        let permit = match timeout {
            Some(wait) => tokio::time::timeout(wait, self.inner.capacity.clone().acquire_owned())
                .await
                .map_err(|_| DispatcherError::EnqueueTimeout)?
                .map_err(|_| DispatcherError::EnqueueTimeout)?,
            None => self.inner.capacity.clone().acquire_owned().await.map_err(|_| DispatcherError::EnqueueTimeout)?,
        };

        let queued = QueuedMessage::new(message, providers, now_ms);
        let delivery_id = queued.delivery_id;
        let weight = queued.priority_weight();
        let seq = self.inner.seq.fetch_add(1, AtomicOrdering::Relaxed);
        self.inner.queue.lock().push(Entry { weight, seq, item: queued, _permit: permit });
        self.inner.not_empty.notify_one();
        Ok(DispatchOutcome::Enqueued(delivery_id))
    }

    pub fn delivery_outcome(&self, delivery_id: Uuid) -> Option<DeliveryOutcome> {
        self.inner.outcomes.lock().get(&delivery_id).cloned()
    }

    /// Records a synthetic delivery for a dry run: every requested
    /// provider is marked successful without ever reaching
    /// [`process_entry`], so [`Self::delivery_outcome`] reports
    /// `DeliveryStatus::Success` the same as a real send would.
    pub fn record_dry_run(&self, providers: Vec<String>) -> Uuid {
        let delivery_id = Uuid::new_v4();
        let mut outcome = DeliveryOutcome::new(delivery_id, providers.clone());
        for provider_name in providers {
            outcome.record(ProviderResult::success(provider_name, 0));
        }
        self.inner.outcomes.lock().insert(delivery_id, outcome);
        delivery_id
    }

    pub fn queue_len(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Arms a timer under `id` that invokes `callback` after `delay`
    /// unless [`Self::cancel_escalation`] fires first. Re-scheduling
    /// under the same id replaces (and aborts) the previous timer.
    pub fn schedule<F, Fut>(&self, id: impl Into<String>, delay: Duration, callback: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let id = id.into();
        let inner = self.inner.clone();
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.escalations.lock().remove(&task_id);
            callback().await;
        });
        if let Some(previous) = self.inner.escalations.lock().insert(id, handle) {
            previous.abort();
        }
    }

    pub fn cancel_escalation(&self, id: &str) {
        if let Some(handle) = self.inner.escalations.lock().remove(id) {
            handle.abort();
        }
    }

    /// Stops accepting new messages, waits up to `grace_period` for
    /// the queue to drain, then cancels the worker pool (§5
    /// "Cancellation").
    pub async fn stop(&self) {
        self.inner.running.store(false, AtomicOrdering::Release);
        let deadline = self.inner.clock.now() + self.inner.config.grace_period;
        loop {
            if self.inner.queue.lock().is_empty() {
                break;
            }
            if self.inner.clock.now() >= deadline {
                break;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        self.inner.cancel.cancel();
        let handles = std::mem::take(&mut *self.workers.lock());
        for handle in handles {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
    }
}

async fn worker_loop<C: Clock>(inner: Arc<Inner<C>>) {
    loop {
        let entry = inner.queue.lock().pop();
        match entry {
            Some(entry) => process_entry(&inner, entry.item).await,
            None => {
                tokio::select! {
                    _ = inner.cancel.cancelled() => return,
                    _ = inner.not_empty.notified() => {}
                }
            }
        }
    }
}

async fn process_entry<C: Clock>(inner: &Arc<Inner<C>>, queued: QueuedMessage) {
    let mut outcome = DeliveryOutcome::new(queued.delivery_id, queued.providers.clone());
    for provider_name in &queued.providers {
        let Some(provider) = inner.providers.get(provider_name).cloned() else {
            warn!(provider = %provider_name, "dispatcher: unknown provider, skipping");
            continue;
        };
        if let Some(limiter) = &inner.rate_limiter {
            limiter.acquire_blocking(provider_name, 1.0, &inner.clock).await;
        }
        let breaker = inner.breakers.get(provider_name);
        let message = queued.message.clone();
        let mut attempts = 0u32;
        let result = mover_status_resilience::execute(&inner.clock, inner.retry_policy, Some(breaker.as_ref()), || {
            attempts += 1;
            let provider = provider.clone();
            let message = message.clone();
            async move {
                match provider.send(&message).await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(SendError::Reported),
                    Err(err) => Err(SendError::Provider(err)),
                }
            }
        })
        .await;

        let provider_result = match result {
            Ok(()) => ProviderResult::success(provider_name.clone(), attempts),
            Err(RetryError::Permanent(err)) => ProviderResult::failure(provider_name.clone(), err.to_string(), attempts),
            Err(RetryError::Exhausted { attempts: n, last }) => ProviderResult::failure(provider_name.clone(), last.to_string(), n),
            Err(RetryError::BreakerOpen(err)) => ProviderResult::failure(provider_name.clone(), err.to_string(), attempts),
            Err(RetryError::Timeout) => ProviderResult::failure(provider_name.clone(), "timed out", attempts),
        };
        debug!(provider = %provider_name, success = provider_result.success, "dispatcher: delivery attempt complete");
        outcome.record(provider_result);
    }
    inner.outcomes.lock().insert(queued.delivery_id, outcome);
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
