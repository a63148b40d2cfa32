// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery tracking data model: per-provider results and the
//! aggregate outcome of dispatching one message to its provider set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Aggregate result across all providers targeted by one delivery.
///
/// Invariant (§8): success <=> every per-provider result is success;
/// failed <=> none is success; partial <=> at least one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Success,
    Partial,
    Failed,
}

/// Outcome of invoking a single provider for a single message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub provider: String,
    pub success: bool,
    pub error: Option<String>,
    pub attempts: u32,
}

impl ProviderResult {
    pub fn success(provider: impl Into<String>, attempts: u32) -> Self {
        Self { provider: provider.into(), success: true, error: None, attempts }
    }

    pub fn failure(provider: impl Into<String>, error: impl Into<String>, attempts: u32) -> Self {
        Self { provider: provider.into(), success: false, error: Some(error.into()), attempts }
    }
}

/// Tracked outcome of one delivery across its requested provider set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub delivery_id: Uuid,
    pub requested_providers: Vec<String>,
    pub results: BTreeMap<String, ProviderResult>,
}

impl DeliveryOutcome {
    pub fn new(delivery_id: Uuid, requested_providers: Vec<String>) -> Self {
        Self { delivery_id, requested_providers, results: BTreeMap::new() }
    }

    pub fn record(&mut self, result: ProviderResult) {
        self.results.insert(result.provider.clone(), result);
    }

    /// Aggregate status per the invariant in §8: success requires every
    /// requested provider to have reported and succeeded.
    pub fn aggregate(&self) -> DeliveryStatus {
        if self.results.len() < self.requested_providers.len() {
            return DeliveryStatus::Pending;
        }
        let successes = self.results.values().filter(|r| r.success).count();
        if successes == self.results.len() {
            DeliveryStatus::Success
        } else if successes == 0 {
            DeliveryStatus::Failed
        } else {
            DeliveryStatus::Partial
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
