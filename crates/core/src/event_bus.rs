// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process pub/sub with hierarchical topics, used inside the
//! orchestrator to fan lifecycle, progress, and error events out to
//! the notification bridge and any other internal listener.
//!
//! Subscribers register on an exact topic (`"progress.updated"`) or a
//! prefix wildcard (`"error.*"`). Publish is synchronous and
//! non-blocking: each matching subscriber runs in turn under the
//! publisher's own correlation context, and a subscriber that panics
//! or returns an error is isolated — logged, and skipped — without
//! affecting the remaining subscribers or the publisher.

use crate::define_id;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

define_id! {
    pub struct SubscriptionId("sub-");
}

/// A topic string, either an exact match (`"progress.updated"`) or a
/// wildcard ending in `.*` (`"progress.*"`), matching any topic that
/// shares its prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    pub fn new(topic: impl Into<String>) -> Self {
        Self(topic.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_wildcard(&self) -> bool {
        self.0.ends_with(".*")
    }

    /// True if `published` is matched by this subscription topic.
    fn matches(&self, published: &str) -> bool {
        if self.is_wildcard() {
            let prefix = &self.0[..self.0.len() - 1]; // keep the trailing '.'
            published.starts_with(prefix)
        } else {
            self.0 == published
        }
    }
}

impl From<&str> for Topic {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

type Handler<T> = Box<dyn Fn(&T) -> Result<(), String> + Send + Sync>;

struct Entry<T> {
    id: SubscriptionId,
    topic: Topic,
    handler: Handler<T>,
}

/// A live registration; dropping it does not unsubscribe (subscriptions
/// are cancelled explicitly via [`EventBus::unsubscribe`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(pub SubscriptionId);

/// Hierarchical-topic, in-process event bus.
///
/// `T` is the event payload type; the orchestrator publishes one
/// unified event enum covering lifecycle, progress, and error events.
pub struct EventBus<T> {
    entries: Arc<Mutex<Vec<Entry<T>>>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self { entries: Arc::clone(&self.entries) }
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self { entries: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Registers a handler on `topic`. Returns a handle usable with
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&self, topic: impl Into<Topic>, handler: F) -> Subscription
    where
        F: Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.entries.lock().push(Entry { id, topic: topic.into(), handler: Box::new(handler) });
        Subscription(id)
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.entries.lock().retain(|e| e.id != subscription.0);
    }

    /// Publishes `event` on `topic` to every matching subscriber.
    ///
    /// A subscriber that returns an error is logged and skipped; it
    /// never prevents later subscribers from running.
    pub fn publish(&self, topic: impl Into<Topic>, event: &T) {
        let topic = topic.into();
        let entries = self.entries.lock();
        for entry in entries.iter() {
            if entry.topic.matches(topic.as_str()) {
                if let Err(err) = (entry.handler)(event) {
                    warn!(topic = topic.as_str(), subscriber = %entry.id, error = %err, "event bus subscriber failed");
                }
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
