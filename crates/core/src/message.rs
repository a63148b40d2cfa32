// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification message data model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Message urgency. Ordering is used both for queue priority and for
/// the dispatcher's "higher first" tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Normal,
    High,
    Urgent,
}

impl Priority {
    /// Integer weight matching the dispatcher's "higher first" queue ordering.
    pub fn weight(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Normal => 1,
            Self::High => 2,
            Self::Urgent => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar metadata value: string, integer, float, or bool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for MetadataValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Immutable notification message. Built via [`MessageBuilder`] and never
/// mutated after construction; formatting/sanitization operate on copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl Message {
    pub fn builder(title: impl Into<String>, content: impl Into<String>) -> MessageBuilder {
        MessageBuilder::new(title, content)
    }

    /// Hashable identity for deduplication: (title, content, priority).
    pub fn dedup_key(&self) -> (String, String, Priority) {
        (self.title.clone(), self.content.clone(), self.priority)
    }
}

#[derive(Debug, Clone)]
pub struct MessageBuilder {
    title: String,
    content: String,
    priority: Priority,
    tags: Vec<String>,
    metadata: BTreeMap<String, MetadataValue>,
}

impl MessageBuilder {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into(), priority: Priority::Normal, tags: Vec::new(), metadata: BTreeMap::new() }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Message {
        Message { title: self.title, content: self.content, priority: self.priority, tags: self.tags, metadata: self.metadata }
    }
}

/// A message paired with dispatch-time routing state: the set of
/// providers it targets, its queue priority, and its delivery id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedMessage {
    pub message: Message,
    pub providers: Vec<String>,
    pub enqueued_at_ms: u64,
    pub delivery_id: Uuid,
}

impl QueuedMessage {
    pub fn new(message: Message, providers: Vec<String>, enqueued_at_ms: u64) -> Self {
        Self { message, providers, enqueued_at_ms, delivery_id: Uuid::new_v4() }
    }

    pub fn priority_weight(&self) -> u8 {
        self.message.priority.weight()
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
