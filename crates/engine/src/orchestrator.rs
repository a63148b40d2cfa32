// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestrator (§4.12): drives the state machine through its full
//! lifecycle -- detection, monitoring, completing, and error/recovery
//! -- wiring together the PID watcher, disk sampler, progress
//! estimator, and notification bridge behind one event bus. A fresh
//! [`CorrelationId`] is assigned at the start of each lifecycle and
//! threaded through every sample and log record it produces.

use crate::rollback::RollbackRegistry;
use crate::state_machine::StateMachine;
use mover_status_core::{
    Clock, Config, ContextValue, CorrelationId, ErrorCategory, ErrorRecord, ErrorSeverity, EventBus, MonitorEvent,
    MonitorState, PidEventKind,
};
use mover_status_notify::Dispatcher;
use mover_status_progress::{EtcMethod, MovingAverage, ProgressEstimator, Retention};
use mover_status_resilience::BreakerRegistry;
use mover_status_sampler::{sample_async, PidWatcher, SampleCache};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Component named for breaker/escalation bookkeeping (§4.6).
const MOVER_COMPONENT: &str = "mover";

/// Whether one lifecycle pass should be followed by another, or the
/// orchestrator should stop entirely (shutdown or external cancellation).
enum LifecycleOutcome {
    Continue,
    Stop,
}

enum MonitorOutcome {
    Completed,
    Cancelled,
    ProcessLost,
}

/// Drives the monitor end to end. Generic over [`Clock`] so tests run
/// against [`mover_status_core::FakeClock`] without real sleeps beyond
/// `tokio::time::sleep`, which respects `tokio::time::pause`.
pub struct Orchestrator<C: Clock> {
    config: Config,
    clock: C,
    pid_path: PathBuf,
    sample_paths: Vec<PathBuf>,
    exclusions: Vec<PathBuf>,
    state: Arc<StateMachine>,
    bus: Arc<EventBus<MonitorEvent>>,
    dispatcher: Arc<Dispatcher<C>>,
    rollback: Arc<RollbackRegistry>,
    escalation: Arc<mover_status_resilience::EscalationTracker>,
    breakers: Arc<BreakerRegistry>,
    cache: SampleCache<C>,
}

impl<C: Clock> Orchestrator<C> {
    pub fn new(config: Config, clock: C, dispatcher: Arc<Dispatcher<C>>, snapshot_path: Option<PathBuf>) -> Self {
        let pid_path = PathBuf::from(&config.process.pid_file);
        let sample_paths = config.process.paths.iter().map(PathBuf::from).collect();
        let exclusions = config.progress.exclusions.iter().map(PathBuf::from).collect();
        let mut state = StateMachine::new(MonitorState::Idle);
        if let Some(path) = snapshot_path {
            state = state.with_snapshot_path(path);
        }
        // The cache's TTL must track the monitoring interval: the
        // default 30s TTL (sized for coalescing concurrent lookups
        // within one tick) would otherwise serve a stale "current"
        // sample across several ticks whenever interval_secs < 30.
        let cache_ttl = Duration::from_secs(config.monitoring.interval_secs);
        Self {
            config,
            clock: clock.clone(),
            pid_path,
            sample_paths,
            exclusions,
            state: Arc::new(state),
            bus: Arc::new(EventBus::new()),
            dispatcher,
            rollback: Arc::new(RollbackRegistry::new()),
            escalation: Arc::new(mover_status_resilience::EscalationTracker::default()),
            breakers: Arc::new(BreakerRegistry::new(3, Duration::from_secs(60))),
            cache: SampleCache::with_ttl(clock, cache_ttl),
        }
    }

    /// The shared event bus; callers subscribe the notification bridge
    /// before calling [`Self::run`].
    pub fn bus(&self) -> Arc<EventBus<MonitorEvent>> {
        self.bus.clone()
    }

    pub fn state(&self) -> Arc<StateMachine> {
        self.state.clone()
    }

    /// Restores any persisted state-machine snapshot. A missing file
    /// is a no-op.
    pub fn restore(&self) -> Result<(), crate::state_machine::TransitionError> {
        self.state.restore()
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.monitoring.interval_secs)
    }

    fn publish(&self, event: MonitorEvent) {
        self.bus.publish(event.topic(), &event);
    }

    fn transition(&self, to: MonitorState) -> Result<MonitorState, crate::state_machine::TransitionError> {
        let now = self.clock.epoch_ms();
        match self.state.transition_to(to, now) {
            Ok(from) => {
                self.publish(MonitorEvent::StateTransitioned { from, to, timestamp_ms: now });
                Ok(from)
            }
            Err(err) => {
                warn!(to = %to, error = %err, "orchestrator: rejected transition");
                Err(err)
            }
        }
    }

    /// Runs lifecycles back to back until `cancel` fires or the state
    /// machine reaches `Shutdown`.
    pub async fn run(&self, cancel: CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                break;
            }
            match self.run_lifecycle(&cancel).await {
                LifecycleOutcome::Continue => {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.poll_interval()) => {}
                    }
                }
                LifecycleOutcome::Stop => break,
            }
        }
        info!("orchestrator: shutting down, unwinding dispatcher");
        self.dispatcher.stop().await;
    }

    /// One full pass: `Idle -> Detecting -> Monitoring -> Completing -> Idle`,
    /// or a detour through `Error`/`Recovering` when the mover process
    /// disappears before the source directory empties out.
    async fn run_lifecycle(&self, cancel: &CancellationToken) -> LifecycleOutcome {
        let correlation = CorrelationId::new();
        if self.config.validate().is_err() {
            warn!(%correlation, "orchestrator: invalid configuration, shutting down");
            let _ = self.transition(MonitorState::Shutdown);
            return LifecycleOutcome::Stop;
        }

        if self.transition(MonitorState::Detecting).is_err() {
            return LifecycleOutcome::Continue;
        }

        let mut watcher = PidWatcher::new(self.pid_path.clone(), self.poll_interval(), self.clock.clone());
        let deadline_ms = self.clock.epoch_ms() + self.config.monitoring.detection_timeout_secs * 1000;

        let Some(pid) = self.detect(&mut watcher, deadline_ms, cancel).await else {
            info!(%correlation, "orchestrator: no mover detected within timeout");
            let _ = self.transition(MonitorState::Idle);
            return LifecycleOutcome::Continue;
        };

        self.publish(MonitorEvent::MoverStarted { pid, timestamp_ms: self.clock.epoch_ms() });
        if self.transition(MonitorState::Monitoring).is_err() {
            return LifecycleOutcome::Continue;
        }
        self.state.set_context("pid", ContextValue::Int(pid as i64));
        let state_for_rollback = self.state.clone();
        self.rollback.register("lifecycle", move || {
            state_for_rollback.set_context("pid", ContextValue::Int(0));
        });

        let baseline = sample_async(self.sample_paths.clone(), self.exclusions.clone(), correlation.clone(), self.clock.clone()).await;
        let mut estimator = ProgressEstimator::new(Retention::Count(self.config.progress.estimation_window), MovingAverage::Simple);
        if let Err(err) = estimator.add_sample(0, baseline.bytes_used as i64, baseline.timestamp_ms) {
            warn!(%correlation, error = %err, "orchestrator: rejected baseline sample");
        }

        match self.monitor(&mut watcher, &mut estimator, baseline.bytes_used, cancel).await {
            MonitorOutcome::Completed => {
                self.publish(MonitorEvent::TransferCompleted { timestamp_ms: self.clock.epoch_ms() });
                let _ = self.transition(MonitorState::Completing);
                let _ = self.transition(MonitorState::Idle);
                self.breakers.get(MOVER_COMPONENT).record_success();
                self.rollback.rollback("lifecycle");
                LifecycleOutcome::Continue
            }
            MonitorOutcome::Cancelled => {
                self.publish(MonitorEvent::MoverStopped { timestamp_ms: self.clock.epoch_ms() });
                self.rollback.rollback("lifecycle");
                LifecycleOutcome::Stop
            }
            MonitorOutcome::ProcessLost => self.handle_process_lost(correlation).await,
        }
    }

    /// Polls the watcher until a `created` transition with a pid
    /// arrives or `deadline_ms` passes. Priming the watcher's first
    /// tick never yields an event (no prior state to compare against),
    /// so detection of an already-running mover at startup is a known
    /// limitation, not a bug (see DESIGN.md).
    async fn detect(&self, watcher: &mut PidWatcher<C>, deadline_ms: u64, cancel: &CancellationToken) -> Option<u32> {
        let _ = watcher.tick().await;
        loop {
            if cancel.is_cancelled() || self.clock.epoch_ms() >= deadline_ms {
                return None;
            }
            tokio::select! {
                _ = cancel.cancelled() => return None,
                _ = tokio::time::sleep(self.poll_interval()) => {}
            }
            if self.clock.epoch_ms() >= deadline_ms {
                return None;
            }
            if let Some(event) = watcher.tick().await {
                if event.kind == PidEventKind::Created {
                    if let Some(pid) = event.pid {
                        return Some(pid);
                    }
                }
            }
        }
    }

    /// Samples on each tick until the watcher reports the pid file
    /// gone. Whether that means "done" or "lost" depends on whether
    /// the source directory actually emptied out.
    async fn monitor(
        &self,
        watcher: &mut PidWatcher<C>,
        estimator: &mut ProgressEstimator,
        baseline_bytes: u64,
        cancel: &CancellationToken,
    ) -> MonitorOutcome {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return MonitorOutcome::Cancelled,
                _ = tokio::time::sleep(self.poll_interval()) => {}
            }
            if cancel.is_cancelled() {
                return MonitorOutcome::Cancelled;
            }

            if let Some(event) = watcher.tick().await {
                if event.kind == PidEventKind::Deleted {
                    let sample = sample_async(self.sample_paths.clone(), self.exclusions.clone(), CorrelationId::new(), self.clock.clone()).await;
                    return if sample.bytes_used == 0 { MonitorOutcome::Completed } else { MonitorOutcome::ProcessLost };
                }
            }

            let sample = self.cache.sample(self.sample_paths.clone(), self.exclusions.clone(), CorrelationId::new()).await;
            let transferred = baseline_bytes.saturating_sub(sample.bytes_used);
            if let Err(err) = estimator.add_sample(transferred as i64, baseline_bytes as i64, sample.timestamp_ms) {
                warn!(error = %err, "orchestrator: rejected progress sample");
                continue;
            }
            let metrics = estimator.metrics(EtcMethod::Adaptive);
            self.publish(MonitorEvent::ProgressUpdated { metrics, timestamp_ms: sample.timestamp_ms });
            if metrics.is_complete() {
                return MonitorOutcome::Completed;
            }
        }
    }

    /// §4.6 error/recovery: classify, record into the sliding escalation
    /// window, and either retry detection once (non-escalating) or
    /// consult the circuit breaker before giving up and unwinding.
    async fn handle_process_lost(&self, correlation: CorrelationId) -> LifecycleOutcome {
        let now = self.clock.epoch_ms();
        let record = ErrorRecord::new(
            ErrorCategory::System,
            ErrorSeverity::High,
            "mover process exited before source directory emptied",
            self.pid_path.display().to_string(),
            now,
        );
        let escalate = self.escalation.record(record.category, record.severity, &record.context, now);
        self.publish(MonitorEvent::ErrorOccurred { record });
        if self.transition(MonitorState::Error).is_err() {
            return LifecycleOutcome::Stop;
        }

        if !escalate {
            info!(%correlation, "orchestrator: process loss within escalation window, retrying detection");
            let _ = self.transition(MonitorState::Recovering);
            let _ = self.transition(MonitorState::Monitoring);
            return LifecycleOutcome::Continue;
        }

        let breaker = self.breakers.get(MOVER_COMPONENT);
        if breaker.check(now, MOVER_COMPONENT).is_err() {
            warn!(%correlation, "orchestrator: circuit breaker open, shutting down");
            self.rollback.rollback_all();
            let _ = self.transition(MonitorState::Shutdown);
            return LifecycleOutcome::Stop;
        }

        let _ = self.transition(MonitorState::Recovering);
        let mut watcher = PidWatcher::new(self.pid_path.clone(), self.poll_interval(), self.clock.clone());
        let deadline_ms = self.clock.epoch_ms() + self.config.monitoring.detection_timeout_secs * 1000;
        match self.detect(&mut watcher, deadline_ms, &CancellationToken::new()).await {
            Some(_pid) => {
                breaker.record_success();
                let _ = self.transition(MonitorState::Monitoring);
                LifecycleOutcome::Continue
            }
            None => {
                breaker.record_failure(now);
                warn!(%correlation, "orchestrator: recovery detection failed, shutting down");
                let _ = self.transition(MonitorState::Error);
                self.rollback.rollback_all();
                let _ = self.transition(MonitorState::Shutdown);
                LifecycleOutcome::Stop
            }
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
