// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn construction_preserves_fields() {
    let sample = DiskSample::new(1_000, 4096, "/mnt/data");
    assert_eq!(sample.timestamp_ms, 1_000);
    assert_eq!(sample.bytes_used, 4096);
    assert_eq!(sample.path_description, "/mnt/data");
}

#[test]
fn samples_are_comparable_by_value() {
    let a = DiskSample::new(1, 2, "p");
    let b = DiskSample::new(1, 2, "p");
    assert_eq!(a, b);
}
