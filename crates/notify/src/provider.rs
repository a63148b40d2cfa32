// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The provider contract (§4.9): every notification delivery endpoint
//! exposes `validate_config`, `send`, `name`. Providers are opaque to
//! the orchestrator and dispatcher — referenced only by name, and
//! constructed from an opaque mapping by a registered factory (§9
//! "Dynamic provider dispatch").

use async_trait::async_trait;
use mover_status_core::Message;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid provider config: {0}")]
    InvalidConfig(String),
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Capability set every notification endpoint must satisfy.
///
/// `Clone + Send + Sync + 'static` so a provider handle can be shared
/// across the dispatcher's worker pool without extra wrapping.
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Raises if the provider's own configuration section is invalid,
    /// independent of any particular message.
    fn validate_config(&self) -> Result<(), ProviderError>;

    /// Sends one message. Must be idempotent at the level of a single
    /// logical message: callers may retry on a transient failure.
    /// Returns `Ok(true)` on success, `Ok(false)` on a reported
    /// (non-exceptional) failure, `Err` on an unexpected fault.
    async fn send(&self, message: &Message) -> Result<bool, ProviderError>;

    fn name(&self) -> &str;
}

/// Factory signature registered under a provider name (§9 "Dynamic
/// provider dispatch": "adding one is registration only").
pub type ProviderFactory = fn(&serde_json::Value) -> Result<Box<dyn Provider>, ProviderError>;

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    pub struct RecordedSend {
        pub title: String,
        pub content: String,
    }

    struct State {
        calls: Vec<RecordedSend>,
        fail_next: u32,
        always_fail: bool,
    }

    /// In-memory provider that records every `send` call; used by the
    /// dispatcher/bridge test suites in place of a real network call.
    #[derive(Clone)]
    pub struct FakeProvider {
        name: String,
        state: Arc<Mutex<State>>,
    }

    impl FakeProvider {
        pub fn new(name: impl Into<String>) -> Self {
            Self { name: name.into(), state: Arc::new(Mutex::new(State { calls: Vec::new(), fail_next: 0, always_fail: false })) }
        }

        /// The next `n` `send` calls report failure instead of success.
        pub fn fail_next(&self, n: u32) {
            self.state.lock().fail_next = n;
        }

        pub fn always_fail(&self) {
            self.state.lock().always_fail = true;
        }

        pub fn calls(&self) -> Vec<RecordedSend> {
            self.state.lock().calls.clone()
        }

        pub fn call_count(&self) -> usize {
            self.state.lock().calls.len()
        }
    }

    #[async_trait]
    impl Provider for FakeProvider {
        fn validate_config(&self) -> Result<(), ProviderError> {
            Ok(())
        }

        async fn send(&self, message: &Message) -> Result<bool, ProviderError> {
            let mut state = self.state.lock();
            state.calls.push(RecordedSend { title: message.title.clone(), content: message.content.clone() });
            if state.always_fail {
                return Ok(false);
            }
            if state.fail_next > 0 {
                state.fail_next -= 1;
                return Ok(false);
            }
            Ok(true)
        }

        fn name(&self) -> &str {
            &self.name
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProvider;

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
