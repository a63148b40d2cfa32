// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mover-status-sampler: disk-usage sampling with a TTL cache, and the
//! PID-file lifecycle watcher with process-table cross-validation.

pub mod cache;
pub mod disk;
pub mod pid_watcher;
pub mod process_probe;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cache::{CacheKey, SampleCache};
pub use disk::{sample_async, walk_sync};
pub use pid_watcher::{PidWatcher, WatcherError};
pub use process_probe::probe_alive;
