// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification bridge (§4.11): subscribes to the orchestrator's event
//! bus, matches each event against a first-match rule list, renders a
//! templated [`Message`], and submits it to the [`crate::dispatcher::Dispatcher`].
//!
//! Two stateful filters sit in front of the dispatcher's own
//! key-based throttle: a progress percent-change threshold (dropping
//! semantically unchanged progress updates) and an escalation timer
//! that re-fires a rule's message if no higher-severity event arrives
//! within its interval.

use crate::dispatcher::Dispatcher;
use crate::template;
use mover_status_core::{Clock, EventBus, Message, MonitorEvent, Priority, Subscription};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Rule {
    /// Exact topic (`"progress.updated"`) or prefix wildcard (`"error.*"`).
    pub pattern: String,
    pub priority: Priority,
    pub title_template: String,
    pub body_template: String,
    pub enabled: bool,
    /// Re-fire this rule's message if no higher-severity event arrives
    /// within this interval.
    pub escalate_after: Option<Duration>,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, priority: Priority, title_template: impl Into<String>, body_template: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), priority, title_template: title_template.into(), body_template: body_template.into(), enabled: true, escalate_after: None }
    }

    pub fn escalate_after(mut self, interval: Duration) -> Self {
        self.escalate_after = Some(interval);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

fn matches_pattern(pattern: &str, topic: &str) -> bool {
    match pattern.strip_suffix(".*") {
        Some(prefix) => topic.starts_with(prefix) && topic[prefix.len()..].starts_with('.'),
        None => pattern == topic,
    }
}

fn event_fields(event: &MonitorEvent) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    match event {
        MonitorEvent::StateTransitioned { from, to, timestamp_ms } => {
            fields.insert("from".to_string(), from.to_string());
            fields.insert("to".to_string(), to.to_string());
            fields.insert("timestamp_ms".to_string(), timestamp_ms.to_string());
        }
        MonitorEvent::ProgressUpdated { metrics, timestamp_ms } => {
            fields.insert("percent".to_string(), format!("{:.1}", metrics.percent));
            fields.insert("bytes_transferred".to_string(), metrics.bytes_transferred.to_string());
            fields.insert("total_bytes".to_string(), metrics.total_bytes.to_string());
            fields.insert("transfer_rate_bps".to_string(), format!("{:.1}", metrics.transfer_rate_bps));
            fields.insert("etc_seconds".to_string(), format!("{:.0}", metrics.etc_seconds));
            fields.insert("confidence".to_string(), format!("{:.2}", metrics.confidence));
            fields.insert("timestamp_ms".to_string(), timestamp_ms.to_string());
        }
        MonitorEvent::ErrorOccurred { record } => {
            fields.insert("category".to_string(), record.category.to_string());
            fields.insert("severity".to_string(), record.severity.to_string());
            fields.insert("message".to_string(), record.message.clone());
            fields.insert("context".to_string(), record.context.clone());
            fields.insert("timestamp_ms".to_string(), record.timestamp_ms.to_string());
        }
        MonitorEvent::TransferCompleted { timestamp_ms } => {
            fields.insert("timestamp_ms".to_string(), timestamp_ms.to_string());
        }
        MonitorEvent::MoverStarted { pid, timestamp_ms } => {
            fields.insert("pid".to_string(), pid.to_string());
            fields.insert("timestamp_ms".to_string(), timestamp_ms.to_string());
        }
        MonitorEvent::MoverStopped { timestamp_ms } => {
            fields.insert("timestamp_ms".to_string(), timestamp_ms.to_string());
        }
    }
    fields
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub rules: Vec<Rule>,
    pub providers: Vec<String>,
    /// §6 `monitoring.dry_run`: format and log, never dispatch.
    pub dry_run: bool,
    /// §6 `progress.min_change_threshold`: suppress a progress
    /// notification whose percent delta since the last emitted one is
    /// below this value.
    pub min_change_threshold: f64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { rules: Vec::new(), providers: Vec::new(), dry_run: false, min_change_threshold: 0.0 }
    }
}

struct Inner<C: Clock> {
    dispatcher: Arc<Dispatcher<C>>,
    config: BridgeConfig,
    last_progress_percent: Mutex<Option<f64>>,
    armed_escalations: Mutex<HashMap<String, u8>>,
}

/// Cheap to clone: wraps its state in `Arc`, so the same bridge handle
/// can back multiple event-bus subscriptions.
pub struct NotificationBridge<C: Clock> {
    inner: Arc<Inner<C>>,
}

impl<C: Clock> Clone for NotificationBridge<C> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<C: Clock> NotificationBridge<C> {
    pub fn new(dispatcher: Arc<Dispatcher<C>>, config: BridgeConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                dispatcher,
                config,
                last_progress_percent: Mutex::new(None),
                armed_escalations: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Registers this bridge on the four event-family topics it can
    /// match rules against. Returns the resulting subscriptions so the
    /// caller can unsubscribe on shutdown.
    pub fn subscribe(&self, bus: &EventBus<MonitorEvent>) -> Vec<Subscription> {
        ["state.*", "progress.*", "error.*", "lifecycle.*"]
            .iter()
            .map(|topic| {
                let this = self.clone();
                bus.subscribe(*topic, move |event: &MonitorEvent| {
                    this.handle_event(event);
                    Ok(())
                })
            })
            .collect()
    }

    /// Matches `event` against the rule list and, on a match, renders
    /// and submits a message. Exposed directly so tests (and callers
    /// outside the event bus) can drive it without a live subscription.
    pub fn handle_event(&self, event: &MonitorEvent) {
        let topic = event.topic();
        let Some(rule) = self.inner.config.rules.iter().find(|r| r.enabled && matches_pattern(&r.pattern, topic)) else {
            return;
        };

        self.cancel_lower_severity_escalations(rule.priority.weight());

        if matches!(event, MonitorEvent::ProgressUpdated { .. }) && self.is_below_change_threshold(event) {
            return;
        }

        let fields = event_fields(event);
        let title = template::render(&rule.title_template, &fields);
        let body = template::render(&rule.body_template, &fields);
        let message = Message::builder(title, body).priority(rule.priority).build();

        if let Some(delay) = rule.escalate_after {
            self.arm_escalation(&rule.pattern, rule.priority.weight(), delay, message.clone());
        }

        self.submit(message, rule.pattern.clone());
    }

    fn is_below_change_threshold(&self, event: &MonitorEvent) -> bool {
        let MonitorEvent::ProgressUpdated { metrics, .. } = event else { return false };
        let mut last = self.inner.last_progress_percent.lock();
        let suppressed = match *last {
            Some(previous) => (metrics.percent - previous).abs() < self.inner.config.min_change_threshold,
            None => false,
        };
        if !suppressed {
            *last = Some(metrics.percent);
        }
        suppressed
    }

    fn cancel_lower_severity_escalations(&self, this_weight: u8) {
        let mut armed = self.inner.armed_escalations.lock();
        let stale: Vec<String> = armed.iter().filter(|(_, weight)| **weight < this_weight).map(|(pattern, _)| pattern.clone()).collect();
        for pattern in stale {
            armed.remove(&pattern);
            self.inner.dispatcher.cancel_escalation(&pattern);
        }
    }

    fn arm_escalation(&self, pattern: &str, weight: u8, delay: Duration, message: Message) {
        self.inner.armed_escalations.lock().insert(pattern.to_string(), weight);
        let dispatcher = self.inner.dispatcher.clone();
        let providers = self.inner.config.providers.clone();
        let key = pattern.to_string();
        self.inner.dispatcher.schedule(pattern.to_string(), delay, move || async move {
            let _ = dispatcher.enqueue(message, providers, Some(&key), None).await;
        });
    }

    fn submit(&self, message: Message, key: String) {
        if self.inner.config.dry_run {
            let delivery_id = self.inner.dispatcher.record_dry_run(self.inner.config.providers.clone());
            info!(title = %message.title, %delivery_id, "bridge: dry run, not dispatching");
            return;
        }
        let dispatcher = self.inner.dispatcher.clone();
        let providers = self.inner.config.providers.clone();
        tokio::spawn(async move {
            let _ = dispatcher.enqueue(message, providers, Some(&key), None).await;
        });
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
