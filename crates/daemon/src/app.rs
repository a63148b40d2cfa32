// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the component graph (dispatcher -> bridge -> orchestrator)
//! from a loaded [`Config`] and drives it until shutdown.

use mover_status_core::{Config, Priority, SystemClock};
use mover_status_engine::Orchestrator;
use mover_status_notify::{BridgeConfig, Dispatcher, DispatcherConfig, LogProvider, NotificationBridge, Provider, Rule, WebhookConfig, WebhookProvider};
use mover_status_resilience::{BreakerRegistry, RateLimiter, RetryPolicy};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// One rule per event family named in `notifications.events` (§6, SPEC_FULL
/// "Configuration"). Vendor-specific phrasing is out of scope (§1); these are
/// the plain, provider-agnostic defaults.
fn default_rule(event_name: &str) -> Option<Rule> {
    match event_name {
        "started" => Some(Rule::new("lifecycle.started", Priority::Normal, "mover started", "mover pid {pid} detected")),
        "progress" => Some(Rule::new(
            "progress.*",
            Priority::Low,
            "mover progress",
            "{percent}% ({bytes_transferred}/{total_bytes} bytes), etc {etc_seconds}s",
        )),
        "completed" => Some(Rule::new("lifecycle.completed", Priority::Normal, "mover finished", "transfer completed")),
        "stopped" => Some(Rule::new("lifecycle.stopped", Priority::Normal, "mover stopped", "mover process exited")),
        "error" => Some(Rule::new("error.*", Priority::High, "mover error", "{category}: {message} ({context})").escalate_after(Duration::from_secs(300))),
        _ => {
            warn!(event = event_name, "app: unknown notification event name, ignoring");
            None
        }
    }
}

fn build_provider(name: &str, section: Option<&toml::Value>) -> Option<Arc<dyn Provider>> {
    match name {
        "log" => Some(Arc::new(LogProvider::new("log"))),
        "webhook" => {
            let value = serde_json::to_value(section?).ok()?;
            match WebhookConfig::from_value(&value) {
                Ok(config) => Some(Arc::new(WebhookProvider::new("webhook", config))),
                Err(err) => {
                    error!(error = %err, "app: invalid webhook provider config");
                    None
                }
            }
        }
        other => {
            warn!(provider = other, "app: no built-in factory for this provider name, skipping");
            None
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("failed to load config: {0}")]
    Config(#[from] crate::config::LoadError),
}

/// Runs the daemon until `cancel` fires, shutting down the dispatcher
/// and orchestrator in order on the way out.
pub async fn run(config_path: &Path, cancel: CancellationToken) -> Result<(), AppError> {
    let config = crate::config::load(config_path)?;
    run_with_config(config, cancel).await;
    Ok(())
}

async fn run_with_config(config: Config, cancel: CancellationToken) {
    let clock = SystemClock;

    let providers: HashMap<String, Arc<dyn Provider>> = config
        .notifications
        .enabled_providers
        .iter()
        .filter_map(|name| build_provider(name, config.providers.get(name)).map(|p| (name.clone(), p)))
        .collect();

    let rate_limiter = config.rate_limit.enabled.then(|| {
        Arc::new(RateLimiter::new(config.rate_limit.capacity, config.rate_limit.refill_rate, config.rate_limit.hourly_quota))
    });
    let breakers = Arc::new(BreakerRegistry::new(3, Duration::from_secs(60)));
    let dispatcher = Arc::new(Dispatcher::new(providers, DispatcherConfig::default(), RetryPolicy::default(), rate_limiter, breakers, clock.clone()));

    let rules: Vec<Rule> = config.notifications.events.iter().filter_map(|name| default_rule(name)).collect();
    let bridge_config = BridgeConfig {
        rules,
        providers: config.notifications.enabled_providers.clone(),
        dry_run: config.monitoring.dry_run,
        min_change_threshold: config.progress.min_change_threshold,
    };
    let bridge = NotificationBridge::new(dispatcher.clone(), bridge_config);

    let snapshot_path = PathBuf::from("mover-status.state.json");
    let orchestrator = Orchestrator::new(config, clock, dispatcher, Some(snapshot_path));
    if let Err(err) = orchestrator.restore() {
        warn!(error = %err, "app: failed to restore persisted state, starting idle");
    }
    let _subscriptions = bridge.subscribe(&orchestrator.bus());

    orchestrator.run(cancel).await;
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
