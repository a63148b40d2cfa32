// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn outcome(providers: &[&str]) -> DeliveryOutcome {
    DeliveryOutcome::new(Uuid::new_v4(), providers.iter().map(|s| s.to_string()).collect())
}

#[test]
fn pending_until_every_requested_provider_reports() {
    let mut out = outcome(&["discord", "telegram"]);
    out.record(ProviderResult::success("discord", 1));
    assert_eq!(out.aggregate(), DeliveryStatus::Pending);
}

#[test]
fn success_requires_all_providers_to_succeed() {
    let mut out = outcome(&["discord", "telegram"]);
    out.record(ProviderResult::success("discord", 1));
    out.record(ProviderResult::success("telegram", 2));
    assert_eq!(out.aggregate(), DeliveryStatus::Success);
}

#[test]
fn failed_requires_none_to_succeed() {
    let mut out = outcome(&["discord", "telegram"]);
    out.record(ProviderResult::failure("discord", "timeout", 3));
    out.record(ProviderResult::failure("telegram", "timeout", 3));
    assert_eq!(out.aggregate(), DeliveryStatus::Failed);
}

#[test]
fn partial_when_mixed_results() {
    let mut out = outcome(&["discord", "telegram"]);
    out.record(ProviderResult::success("discord", 1));
    out.record(ProviderResult::failure("telegram", "rate limited", 3));
    assert_eq!(out.aggregate(), DeliveryStatus::Partial);
}
