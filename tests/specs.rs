// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios (spec.md §8 "End-to-end scenarios"), each
//! driving the real components together rather than a single crate in
//! isolation. Timing-sensitive scenarios use small real durations
//! (milliseconds/low seconds) rather than the literal seconds named in
//! the spec prose, which would make this suite unreasonably slow; the
//! ordering and threshold relationships under test are scale-invariant.

use mover_status_core::{
    Config, FakeClock, Message, MonitoringConfig, NotificationsConfig, Priority, ProcessConfig, ProgressConfig, RateLimitConfig,
};
use mover_status_engine::Orchestrator;
use mover_status_notify::provider::fake::FakeProvider;
use mover_status_notify::{BridgeConfig, Dispatcher, DispatcherConfig, NotificationBridge, Provider, Rule};
use mover_status_resilience::{BreakerRegistry, RetryPolicy};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

fn config(paths: &[&std::path::Path], pid_file: &std::path::Path, interval_secs: u64, detection_timeout_secs: u64) -> Config {
    Config {
        monitoring: MonitoringConfig { interval_secs, detection_timeout_secs, dry_run: false, rebaseline_on_pid_change: false },
        process: ProcessConfig {
            name: "mover".into(),
            paths: paths.iter().map(|p| p.display().to_string()).collect(),
            pid_file: pid_file.display().to_string(),
        },
        progress: ProgressConfig::default(),
        notifications: NotificationsConfig::default(),
        rate_limit: RateLimitConfig::default(),
        providers: BTreeMap::new(),
    }
}

fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new("lifecycle.started", Priority::Normal, "mover started", "pid {pid}"),
        Rule::new("progress.*", Priority::Low, "mover progress", "{percent}%"),
        Rule::new("lifecycle.completed", Priority::Normal, "mover finished", "transfer completed"),
    ]
}

fn dispatcher_with(providers: HashMap<String, Arc<dyn Provider>>, clock: FakeClock) -> Arc<Dispatcher<FakeClock>> {
    Arc::new(Dispatcher::new(
        providers,
        DispatcherConfig::default(),
        RetryPolicy { max_attempts: 1, base_delay: Duration::from_millis(1), max_backoff: Duration::from_millis(5), jitter: false, timeout: None },
        None,
        Arc::new(BreakerRegistry::new(3, Duration::from_secs(60))),
        clock,
    ))
}

/// Scenario 1: happy path. A full lifecycle fires a `started`
/// notification once the pid appears, at least one progress
/// notification as the source directory shrinks, and one `completed`
/// notification once it empties out.
#[tokio::test(flavor = "multi_thread")]
async fn happy_path_notifies_started_progress_then_completed() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload.bin");
    let pid_path = dir.path().join("mover.pid");
    std::fs::write(&payload, vec![0u8; 1_000_000]).unwrap();

    let cfg = config(&[dir.path()], &pid_path, 1, 5);
    let clock = FakeClock::new();
    let fake = FakeProvider::new("log");
    let providers: HashMap<String, Arc<dyn Provider>> = HashMap::from([("log".to_string(), Arc::new(fake.clone()) as Arc<dyn Provider>)]);
    let dispatcher = dispatcher_with(providers, clock.clone());

    let bridge = NotificationBridge::new(
        dispatcher.clone(),
        BridgeConfig { rules: default_rules(), providers: vec!["log".to_string()], dry_run: false, min_change_threshold: 0.0 },
    );
    let orch = Arc::new(Orchestrator::new(cfg, clock.clone(), dispatcher, None));
    let _subscriptions = bridge.subscribe(&orch.bus());

    let cancel = CancellationToken::new();
    let run_handle = tokio::spawn({
        let orch = orch.clone();
        let cancel = cancel.clone();
        async move { orch.run(cancel).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    std::fs::write(&pid_path, "12345").unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;
    std::fs::write(&payload, vec![0u8; 500_000]).unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;
    std::fs::remove_file(&payload).unwrap();
    std::fs::remove_file(&pid_path).unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;
    cancel.cancel();
    run_handle.await.unwrap();

    let calls = fake.calls();
    assert!(calls.iter().any(|c| c.title == "mover started" && c.content.contains("12345")), "expected a started notification, got {calls:?}");
    assert!(calls.iter().any(|c| c.title == "mover progress"), "expected a progress notification, got {calls:?}");
    assert!(calls.iter().any(|c| c.title == "mover finished"), "expected a completed notification, got {calls:?}");
}

/// Scenario 2: permission-denied during traversal. A subtree the
/// walker cannot read still yields a partial total rather than a
/// panic or error.
#[cfg(unix)]
#[test]
fn traversal_degrades_to_partial_total_on_permission_denied() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("visible.bin"), vec![0u8; 4096]).unwrap();
    let locked = dir.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::write(locked.join("secret.bin"), vec![0u8; 8192]).unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    let sample = mover_status_sampler::walk_sync(&[dir.path().to_path_buf()], &[], 0);

    // Restore so tempdir's Drop can clean up regardless of whether the
    // walk above actually got blocked (irrelevant when running as root).
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert!(sample.bytes_used >= 4096, "visible file must always be counted");
}

/// Scenario 3: mover crashes mid-transfer. The pid file disappears
/// while the source directory still holds most of its bytes; per
/// DESIGN.md's open-question decision this is a process loss, not a
/// clean completion, so the orchestrator publishes an error event and
/// lands back in MONITORING (ready to pick the mover back up) instead
/// of jumping straight to COMPLETING/IDLE with the last-seen percent.
#[tokio::test(flavor = "multi_thread")]
async fn mover_crash_mid_transfer_is_classified_as_process_loss_not_completion() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload.bin");
    let pid_path = dir.path().join("mover.pid");
    std::fs::write(&payload, vec![0u8; 1_000_000]).unwrap();

    let cfg = config(&[dir.path()], &pid_path, 1, 1);
    let clock = FakeClock::new();
    let orch = Arc::new(Orchestrator::new(cfg, clock.clone(), dispatcher_with(HashMap::new(), clock.clone()), None));

    let error_seen = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = error_seen.clone();
    let _subscription = orch.bus().subscribe("error.*", move |_event: &mover_status_core::MonitorEvent| {
        flag.store(true, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    });

    let cancel = CancellationToken::new();
    let run_handle = tokio::spawn({
        let orch = orch.clone();
        let cancel = cancel.clone();
        async move { orch.run(cancel).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    std::fs::write(&pid_path, "777").unwrap();

    // Let detection complete and monitoring begin (baseline ~1_000_000 bytes).
    tokio::time::sleep(Duration::from_millis(1100)).await;

    // The mover vanishes with the source directory still non-empty.
    std::fs::remove_file(&pid_path).unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;

    cancel.cancel();
    run_handle.await.unwrap();

    assert!(error_seen.load(std::sync::atomic::Ordering::SeqCst), "expected an error event for the mid-transfer process loss");
    assert_eq!(orch.state().current(), mover_status_core::MonitorState::Monitoring, "a non-escalating loss should return to monitoring, not completing/idle");
}

/// Scenario 4: a provider that fails once with a retryable error and
/// succeeds on the second attempt produces exactly one logical
/// delivery, recorded as two attempts, spaced at least the configured
/// backoff apart.
#[tokio::test(flavor = "multi_thread")]
async fn rate_limited_provider_recovers_on_second_attempt() {
    let fake = FakeProvider::new("webhook");
    fake.fail_next(1);
    let providers: HashMap<String, Arc<dyn Provider>> = HashMap::from([("webhook".to_string(), Arc::new(fake.clone()) as Arc<dyn Provider>)]);
    let retry_policy = RetryPolicy { max_attempts: 3, base_delay: Duration::from_millis(200), max_backoff: Duration::from_secs(1), jitter: false, timeout: None };
    let dispatcher = Dispatcher::new(providers, DispatcherConfig::default(), retry_policy, None, Arc::new(BreakerRegistry::new(5, Duration::from_secs(30))), FakeClock::new());

    let started = Instant::now();
    let outcome = dispatcher.enqueue(Message::builder("t", "c").build(), vec!["webhook".to_string()], None, None).await.unwrap();
    let mover_status_notify::DispatchOutcome::Enqueued(id) = outcome else { panic!("expected Enqueued") };

    let delivery = loop {
        if let Some(outcome) = dispatcher.delivery_outcome(id) {
            break outcome;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    };
    let elapsed = started.elapsed();
    dispatcher.stop().await;

    assert_eq!(delivery.aggregate(), mover_status_core::DeliveryStatus::Success);
    assert_eq!(fake.call_count(), 2);
    assert_eq!(delivery.results["webhook"].attempts, 2);
    assert!(elapsed >= Duration::from_millis(190), "expected at least the 200ms backoff between attempts, got {elapsed:?}");
}

/// Scenario 5: a webhook URL embedded in a log-bound message keeps its
/// host/id but has the token segment replaced.
#[test]
fn webhook_secret_is_redacted_from_a_log_message() {
    let message = "delivery failed: https://discord.com/api/webhooks/111/AAA";
    let sanitized = mover_status_notify::sanitize_exception("SendFailed", message);

    assert!(sanitized.contains("https://discord.com/api/webhooks/111/<REDACTED>"));
    assert!(!sanitized.contains("AAA"));
    assert!(sanitized.starts_with("SendFailed: "));
}

/// Scenario 6: two identical messages enqueued within the dedup window
/// under the same throttle key result in exactly one dispatch; the
/// second is reported as a duplicate, not silently dropped or queued
/// twice.
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_message_within_dedup_window_is_not_redelivered() {
    let fake = FakeProvider::new("log");
    let providers: HashMap<String, Arc<dyn Provider>> = HashMap::from([("log".to_string(), Arc::new(fake.clone()) as Arc<dyn Provider>)]);
    let dispatcher = Dispatcher::new(providers, DispatcherConfig::default(), RetryPolicy::default(), None, Arc::new(BreakerRegistry::new(5, Duration::from_secs(30))), FakeClock::new());

    let message = Message::builder("mover progress", "50%").build();
    let first = dispatcher.enqueue(message.clone(), vec!["log".to_string()], Some("progress"), None).await.unwrap();
    let second = dispatcher.enqueue(message, vec!["log".to_string()], Some("progress"), None).await.unwrap();

    assert!(matches!(first, mover_status_notify::DispatchOutcome::Enqueued(_)));
    assert_eq!(second, mover_status_notify::DispatchOutcome::Duplicate);

    tokio::time::sleep(Duration::from_millis(50)).await;
    dispatcher.stop().await;
    assert_eq!(fake.call_count(), 1);
}
