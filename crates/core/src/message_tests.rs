// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builder_defaults_to_normal_priority_and_empty_tags() {
    let msg = Message::builder("title", "content").build();
    assert_eq!(msg.priority, Priority::Normal);
    assert!(msg.tags.is_empty());
    assert!(msg.metadata.is_empty());
}

#[test]
fn builder_collects_tags_and_metadata() {
    let msg = Message::builder("t", "c")
        .priority(Priority::Urgent)
        .tag("disk")
        .tag("mover")
        .metadata("percent", 42i64)
        .build();
    assert_eq!(msg.tags, vec!["disk", "mover"]);
    assert_eq!(msg.metadata.get("percent"), Some(&MetadataValue::Int(42)));
}

#[test]
fn priority_weight_orders_urgent_above_low() {
    assert!(Priority::Urgent.weight() > Priority::High.weight());
    assert!(Priority::High.weight() > Priority::Normal.weight());
    assert!(Priority::Normal.weight() > Priority::Low.weight());
}

#[test]
fn dedup_key_ignores_tags_and_metadata() {
    let a = Message::builder("t", "c").tag("x").build();
    let b = Message::builder("t", "c").metadata("k", "v").build();
    assert_eq!(a.dedup_key(), b.dedup_key());
}

#[test]
fn queued_message_priority_weight_matches_inner_message() {
    let msg = Message::builder("t", "c").priority(Priority::High).build();
    let queued = QueuedMessage::new(msg, vec!["discord".into()], 0);
    assert_eq!(queued.priority_weight(), Priority::High.weight());
}

#[test]
fn queued_message_ids_are_unique() {
    let msg = Message::builder("t", "c").build();
    let a = QueuedMessage::new(msg.clone(), vec![], 0);
    let b = QueuedMessage::new(msg, vec![], 0);
    assert_ne!(a.delivery_id, b.delivery_id);
}
