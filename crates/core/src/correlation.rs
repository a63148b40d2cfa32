// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Correlation context: a per-logical-operation identifier propagated
//! through every spawned task/subroutine and every log record emitted
//! within that operation.
//!
//! Per §9 ("Threading of correlation context"), this is carried as an
//! explicit value rather than a dynamic/thread-local context variable:
//! callers pass a `CorrelationId` as the first argument of internal
//! functions and store it in spawned tasks. The stable log field name
//! this maps to is `correlation_id` (see `mover-status-notify::sanitize`).

use crate::define_id;

define_id! {
    /// Identifier for one logical operation (one lifecycle, from
    /// IDLE -> DETECTING onward), propagated through every task and
    /// log record emitted while that lifecycle is active.
    pub struct CorrelationId("cor-");
}

/// Fallback string used in log records emitted outside any tracked
/// correlation context.
pub const NO_CORRELATION: &str = "N/A";

#[cfg(test)]
#[path = "correlation_tests.rs"]
mod tests;
