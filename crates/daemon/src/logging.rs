// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assembles the tracing subscriber (SPEC_FULL "Logging"):
//! [`CorrelationLayer`] populates span extensions with the active
//! `correlation_id`, [`SanitizingLayer`] is the sink itself -- it
//! writes one redacted JSON object per event -- and `EnvFilter` gates
//! verbosity the usual way (`RUST_LOG`, defaulting to `info`).

use mover_status_notify::{CorrelationLayer, SanitizingLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Call once, at process start.
pub fn install() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(CorrelationLayer::new())
        .with(SanitizingLayer::new(std::io::stdout()))
        .init();
}
