// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mover-status-storage: persistence for the state-machine snapshot
//! (§6 "State snapshot file").

pub mod snapshot;

pub use snapshot::{load, save, SnapshotError};
