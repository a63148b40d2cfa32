// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic HTTP POST JSON provider (§4.9, §1: "the individual provider
//! wire protocols ... beyond the abstract 'provider' contract they
//! satisfy" are out of scope). This illustrates the contract without
//! speaking any concrete vendor protocol; Discord/Telegram-specific
//! payload shaping is left to out-of-tree providers registered under
//! the same factory mechanism (§9).

use crate::provider::{Provider, ProviderError};
use async_trait::async_trait;
use mover_status_core::Message;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ProviderError> {
        let url = value
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProviderError::InvalidConfig("webhook provider requires a string \"url\" field".to_string()))?
            .to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ProviderError::InvalidConfig(format!("webhook url must be http(s): {url:?}")));
        }
        let timeout_secs = value.get("timeout_secs").and_then(|v| v.as_u64());
        Ok(Self { url, timeout: timeout_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TIMEOUT) })
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    title: &'a str,
    content: &'a str,
    priority: &'a str,
    tags: &'a [String],
}

pub struct WebhookProvider {
    name: String,
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookProvider {
    pub fn new(name: impl Into<String>, config: WebhookConfig) -> Self {
        let client = reqwest::Client::builder().timeout(config.timeout).build().unwrap_or_default();
        Self { name: name.into(), config, client }
    }
}

#[async_trait]
impl Provider for WebhookProvider {
    fn validate_config(&self) -> Result<(), ProviderError> {
        if self.config.url.is_empty() {
            return Err(ProviderError::InvalidConfig("webhook url must not be empty".to_string()));
        }
        Ok(())
    }

    async fn send(&self, message: &Message) -> Result<bool, ProviderError> {
        let payload =
            WebhookPayload { title: &message.title, content: &message.content, priority: message.priority.as_str(), tags: &message.tags };
        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| ProviderError::SendFailed(err.to_string()))?;
        Ok(response.status().is_success())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "webhook_provider_tests.rs"]
mod tests;
