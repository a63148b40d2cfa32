// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in provider that simply logs the message via `tracing`, no
//! network involved. Useful as the default provider in `dry_run` mode
//! and in tests that don't want to stand up a real endpoint.

use crate::provider::{Provider, ProviderError};
use async_trait::async_trait;
use mover_status_core::Message;
use tracing::info;

pub struct LogProvider {
    name: String,
}

impl LogProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LogProvider {
    fn default() -> Self {
        Self::new("log")
    }
}

#[async_trait]
impl Provider for LogProvider {
    fn validate_config(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn send(&self, message: &Message) -> Result<bool, ProviderError> {
        info!(
            provider = %self.name,
            title = %message.title,
            priority = %message.priority,
            tags = ?message.tags,
            "notification"
        );
        Ok(true)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "log_provider_tests.rs"]
mod tests;
