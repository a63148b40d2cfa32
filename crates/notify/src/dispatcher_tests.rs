// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::provider::fake::FakeProvider;
use mover_status_core::FakeClock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

fn providers(names: &[&str]) -> (HashMap<String, Arc<dyn Provider>>, HashMap<String, FakeProvider>) {
    let mut map: HashMap<String, Arc<dyn Provider>> = HashMap::new();
    let mut fakes = HashMap::new();
    for name in names {
        let fake = FakeProvider::new(*name);
        map.insert(name.to_string(), Arc::new(fake.clone()));
        fakes.insert(name.to_string(), fake);
    }
    (map, fakes)
}

fn dispatcher(providers: HashMap<String, Arc<dyn Provider>>, config: DispatcherConfig) -> Dispatcher<FakeClock> {
    Dispatcher::new(
        providers,
        config,
        RetryPolicy { max_attempts: 2, base_delay: Duration::from_millis(1), max_backoff: Duration::from_millis(5), jitter: false, timeout: None },
        None,
        Arc::new(BreakerRegistry::new(5, Duration::from_secs(30))),
        FakeClock::new(),
    )
}

async fn wait_until_empty(d: &Dispatcher<FakeClock>) {
    for _ in 0..200 {
        if d.queue_len() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn delivers_to_single_provider() {
    let (provider_map, fakes) = providers(&["log"]);
    let d = dispatcher(provider_map, DispatcherConfig::default());
    let outcome = d
        .enqueue(Message::builder("t", "c").build(), vec!["log".to_string()], None, None)
        .await
        .unwrap();
    let DispatchOutcome::Enqueued(id) = outcome else { panic!("expected Enqueued") };
    wait_until_empty(&d).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    let delivery = d.delivery_outcome(id).expect("outcome recorded");
    assert_eq!(delivery.aggregate(), mover_status_core::DeliveryStatus::Success);
    assert_eq!(fakes["log"].call_count(), 1);
    d.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn aggregates_partial_delivery_across_providers() {
    let (provider_map, fakes) = providers(&["log", "webhook"]);
    fakes["webhook"].always_fail();
    let d = dispatcher(provider_map, DispatcherConfig::default());
    let DispatchOutcome::Enqueued(id) = d
        .enqueue(Message::builder("t", "c").build(), vec!["log".to_string(), "webhook".to_string()], None, None)
        .await
        .unwrap()
    else {
        panic!("expected Enqueued")
    };
    wait_until_empty(&d).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    let delivery = d.delivery_outcome(id).expect("outcome recorded");
    assert_eq!(delivery.aggregate(), mover_status_core::DeliveryStatus::Partial);
    d.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn retries_transient_failure_then_succeeds() {
    let (provider_map, fakes) = providers(&["webhook"]);
    fakes["webhook"].fail_next(1);
    let d = dispatcher(provider_map, DispatcherConfig::default());
    let DispatchOutcome::Enqueued(id) = d
        .enqueue(Message::builder("t", "c").build(), vec!["webhook".to_string()], None, None)
        .await
        .unwrap()
    else {
        panic!("expected Enqueued")
    };
    wait_until_empty(&d).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    let delivery = d.delivery_outcome(id).expect("outcome recorded");
    assert_eq!(delivery.aggregate(), mover_status_core::DeliveryStatus::Success);
    assert_eq!(fakes["webhook"].call_count(), 2);
    d.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn throttle_drops_second_message_within_interval() {
    let (provider_map, _fakes) = providers(&["log"]);
    let config = DispatcherConfig { throttle_interval: Duration::from_secs(60), ..DispatcherConfig::default() };
    let d = dispatcher(provider_map, config);
    let first = d.enqueue(Message::builder("a", "1").build(), vec!["log".to_string()], Some("key"), None).await.unwrap();
    assert!(matches!(first, DispatchOutcome::Enqueued(_)));
    let second = d.enqueue(Message::builder("b", "2").build(), vec!["log".to_string()], Some("key"), None).await.unwrap();
    assert_eq!(second, DispatchOutcome::Throttled);
    d.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn dedup_drops_identical_message() {
    let (provider_map, _fakes) = providers(&["log"]);
    let d = dispatcher(provider_map, DispatcherConfig::default());
    let message = Message::builder("same", "same").build();
    let first = d.enqueue(message.clone(), vec!["log".to_string()], None, None).await.unwrap();
    assert!(matches!(first, DispatchOutcome::Enqueued(_)));
    let second = d.enqueue(message, vec!["log".to_string()], None, None).await.unwrap();
    assert_eq!(second, DispatchOutcome::Duplicate);
    d.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn enqueue_times_out_when_queue_is_full() {
    let (provider_map, fakes) = providers(&["log"]);
    fakes["log"].always_fail();
    let config = DispatcherConfig { worker_count: 0, queue_capacity: 1, ..DispatcherConfig::default() };
    let d = dispatcher(provider_map, config);
    let first = d.enqueue(Message::builder("a", "1").build(), vec!["log".to_string()], None, None).await.unwrap();
    assert!(matches!(first, DispatchOutcome::Enqueued(_)));
    let second = d.enqueue(Message::builder("b", "2").build(), vec!["log".to_string()], None, Some(Duration::from_millis(20))).await;
    assert!(matches!(second, Err(DispatcherError::EnqueueTimeout)));
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_rejects_further_enqueues() {
    let (provider_map, _fakes) = providers(&["log"]);
    let d = dispatcher(provider_map, DispatcherConfig::default());
    d.stop().await;
    assert!(!d.is_running());
    let result = d.enqueue(Message::builder("a", "1").build(), vec!["log".to_string()], None, None).await;
    assert!(matches!(result, Err(DispatcherError::NotRunning)));
}

#[tokio::test(flavor = "multi_thread")]
async fn entry_ordering_prefers_priority_then_fifo() {
    let low = Entry {
        weight: Priority::Low.weight(),
        seq: 0,
        item: QueuedMessage::new(Message::builder("a", "a").build(), vec![], 0),
        _permit: Semaphore::new(2).try_acquire_owned().unwrap(),
    };
    let urgent = Entry {
        weight: Priority::Urgent.weight(),
        seq: 1,
        item: QueuedMessage::new(Message::builder("b", "b").build(), vec![], 0),
        _permit: Semaphore::new(2).try_acquire_owned().unwrap(),
    };
    assert!(urgent > low);

    let older_normal = Entry {
        weight: Priority::Normal.weight(),
        seq: 0,
        item: QueuedMessage::new(Message::builder("c", "c").build(), vec![], 0),
        _permit: Semaphore::new(2).try_acquire_owned().unwrap(),
    };
    let newer_normal = Entry {
        weight: Priority::Normal.weight(),
        seq: 1,
        item: QueuedMessage::new(Message::builder("d", "d").build(), vec![], 0),
        _permit: Semaphore::new(2).try_acquire_owned().unwrap(),
    };
    assert!(older_normal > newer_normal, "older sequence number should pop first within a priority");
}

#[tokio::test(flavor = "multi_thread")]
async fn schedule_invokes_callback_after_delay() {
    let (provider_map, _fakes) = providers(&["log"]);
    let d = dispatcher(provider_map, DispatcherConfig::default());
    let fired = Arc::new(AtomicU32::new(0));
    let fired_clone = fired.clone();
    d.schedule("esc-1", Duration::from_millis(10), move || {
        let fired = fired_clone.clone();
        async move {
            fired.fetch_add(1, Ordering::SeqCst);
        }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    d.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_escalation_prevents_callback() {
    let (provider_map, _fakes) = providers(&["log"]);
    let d = dispatcher(provider_map, DispatcherConfig::default());
    let fired = Arc::new(AtomicU32::new(0));
    let fired_clone = fired.clone();
    d.schedule("esc-2", Duration::from_millis(30), move || {
        let fired = fired_clone.clone();
        async move {
            fired.fetch_add(1, Ordering::SeqCst);
        }
    });
    d.cancel_escalation("esc-2");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    d.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn record_dry_run_marks_every_provider_successful() {
    let (provider_map, fakes) = providers(&["log", "webhook"]);
    let d = dispatcher(provider_map, DispatcherConfig::default());
    let id = d.record_dry_run(vec!["log".to_string(), "webhook".to_string()]);

    let delivery = d.delivery_outcome(id).expect("dry run outcome recorded");
    assert_eq!(delivery.aggregate(), mover_status_core::DeliveryStatus::Success);
    assert_eq!(fakes["log"].call_count(), 0, "dry run must never reach a provider");
    assert_eq!(fakes["webhook"].call_count(), 0);
    d.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn rescheduling_same_id_replaces_previous_timer() {
    let (provider_map, _fakes) = providers(&["log"]);
    let d = dispatcher(provider_map, DispatcherConfig::default());
    let fired = Arc::new(AtomicU32::new(0));
    for _ in 0..2 {
        let fired_clone = fired.clone();
        d.schedule("esc-3", Duration::from_millis(30), move || {
            let fired = fired_clone.clone();
            async move {
                fired.fetch_add(1, Ordering::SeqCst);
            }
        });
    }
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1, "only the latest schedule under an id should fire");
    d.stop().await;
}
