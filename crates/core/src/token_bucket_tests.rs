// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_bucket_starts_full() {
    let bucket = TokenBucket::new(10.0, 1.0, 0);
    assert_eq!(bucket.tokens, 10.0);
}

#[test]
fn refill_clamps_to_capacity() {
    let mut bucket = TokenBucket::new(5.0, 10.0, 0);
    bucket.tokens = 0.0;
    bucket.last_update_ms = 0;
    bucket.refill(10_000);
    assert_eq!(bucket.tokens, 5.0);
}

#[test]
fn try_consume_succeeds_when_tokens_available() {
    let mut bucket = TokenBucket::new(5.0, 1.0, 0);
    assert!(bucket.try_consume(3.0, 0));
    assert_eq!(bucket.tokens, 2.0);
}

#[test]
fn try_consume_fails_and_does_not_mutate_when_insufficient() {
    let mut bucket = TokenBucket::new(5.0, 0.0, 0);
    bucket.tokens = 1.0;
    assert!(!bucket.try_consume(3.0, 0));
    assert_eq!(bucket.tokens, 1.0);
}

#[test]
fn tokens_never_go_negative() {
    let mut bucket = TokenBucket::new(5.0, 0.0, 0);
    bucket.tokens = 0.0;
    assert!(!bucket.try_consume(1.0, 0));
    assert!(bucket.tokens >= 0.0);
}

#[test]
fn wait_seconds_is_zero_when_available() {
    let bucket = TokenBucket::new(5.0, 1.0, 0);
    assert_eq!(bucket.wait_seconds(5.0), 0.0);
}

#[test]
fn wait_seconds_computes_remaining_time_at_refill_rate() {
    let mut bucket = TokenBucket::new(5.0, 2.0, 0);
    bucket.tokens = 0.0;
    assert_eq!(bucket.wait_seconds(4.0), 2.0);
}
