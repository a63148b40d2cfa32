// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn parses_valid_config() {
    let config = WebhookConfig::from_value(&json!({"url": "https://example.com/hook"})).unwrap();
    assert_eq!(config.url, "https://example.com/hook");
    assert_eq!(config.timeout, DEFAULT_TIMEOUT);
}

#[test]
fn rejects_missing_url() {
    assert!(WebhookConfig::from_value(&json!({})).is_err());
}

#[test]
fn rejects_non_http_scheme() {
    assert!(WebhookConfig::from_value(&json!({"url": "ftp://example.com"})).is_err());
}

#[test]
fn honors_custom_timeout() {
    let config = WebhookConfig::from_value(&json!({"url": "https://example.com", "timeout_secs": 3})).unwrap();
    assert_eq!(config.timeout, Duration::from_secs(3));
}

#[test]
fn validate_config_rejects_empty_url() {
    let provider = WebhookProvider::new("webhook", WebhookConfig { url: String::new(), timeout: DEFAULT_TIMEOUT });
    assert!(provider.validate_config().is_err());
}
