// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mover-status-notify: the provider contract and built-in providers
//! (§4.9), secret redaction and logging layers (§4.13), the bounded
//! priority dispatcher (§4.10), and the notification bridge (§4.11).

pub mod bridge;
pub mod color;
pub mod dispatcher;
pub mod markdown;
pub mod provider;
pub mod providers;
pub mod sanitize;
pub mod template;

pub use bridge::{BridgeConfig, NotificationBridge, Rule};
pub use color::priority_color;
pub use dispatcher::{DispatchOutcome, Dispatcher, DispatcherConfig, DispatcherError};
pub use markdown::escape_markdown_v2;
pub use provider::{Provider, ProviderError, ProviderFactory};
pub use providers::{LogProvider, WebhookConfig, WebhookProvider};
pub use sanitize::{sanitize_exception, sanitize_url, sanitize_value, CorrelationLayer, SanitizingLayer};
