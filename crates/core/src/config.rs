// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated configuration shape consumed by the orchestrator (§6).
//!
//! This module holds only the data shape and its structural
//! validation; parsing a TOML/JSON file into this shape is
//! `mover-status-daemon::config`'s concern.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("process.paths must be non-empty")]
    EmptyProcessPaths,
    #[error("monitoring.interval must be >= 1 second")]
    IntervalTooSmall,
    #[error("enabled provider {0:?} has no providers.{0} section")]
    MissingProviderSection(String),
    #[error("unknown top-level field: {0:?}")]
    UnknownField(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitoringConfig {
    pub interval_secs: u64,
    pub detection_timeout_secs: u64,
    #[serde(default)]
    pub dry_run: bool,
    /// SPEC supplement: full vs cheap re-baseline when the watcher
    /// reports a `modified` PID event (§9 open question).
    #[serde(default)]
    pub rebaseline_on_pid_change: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self { interval_secs: 5, detection_timeout_secs: 30, dry_run: false, rebaseline_on_pid_change: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessConfig {
    pub name: String,
    pub paths: Vec<String>,
    /// PID file the lifecycle detector polls. SPEC supplement: the
    /// distilled config shape folded this into `process.*` without
    /// naming it; kept as its own field since the watcher takes a
    /// single path, distinct from the plural sampled `paths`.
    #[serde(default = "default_pid_file")]
    pub pid_file: String,
}

fn default_pid_file() -> String {
    "/var/run/mover.pid".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgressConfig {
    #[serde(default = "default_min_change_threshold")]
    pub min_change_threshold: f64,
    #[serde(default = "default_estimation_window")]
    pub estimation_window: usize,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

fn default_min_change_threshold() -> f64 {
    1.0
}

fn default_estimation_window() -> usize {
    1000
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { min_change_threshold: default_min_change_threshold(), estimation_window: default_estimation_window(), exclusions: Vec::new() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsConfig {
    pub enabled_providers: Vec<String>,
    #[serde(default)]
    pub events: Vec<String>,
}

/// Token-bucket-plus-hourly-quota limits applied across every provider
/// dispatch (§4.8). Disabled by default: most single-user setups never
/// trip a provider's own rate limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_rate_limit_capacity")]
    pub capacity: f64,
    #[serde(default = "default_rate_limit_refill_rate")]
    pub refill_rate: f64,
    #[serde(default = "default_rate_limit_hourly_quota")]
    pub hourly_quota: u32,
}

fn default_rate_limit_capacity() -> f64 {
    30.0
}

fn default_rate_limit_refill_rate() -> f64 {
    0.5
}

fn default_rate_limit_hourly_quota() -> u32 {
    100
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { enabled: false, capacity: default_rate_limit_capacity(), refill_rate: default_rate_limit_refill_rate(), hourly_quota: default_rate_limit_hourly_quota() }
    }
}

/// Fully validated configuration object the orchestrator is constructed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub monitoring: MonitoringConfig,
    pub process: ProcessConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Opaque per-provider mapping, keyed by provider name.
    #[serde(default)]
    pub providers: BTreeMap<String, toml::Value>,
}

impl Config {
    /// Structural validation beyond what serde's shape already enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.process.paths.is_empty() {
            return Err(ConfigError::EmptyProcessPaths);
        }
        if self.monitoring.interval_secs < 1 {
            return Err(ConfigError::IntervalTooSmall);
        }
        for provider in &self.notifications.enabled_providers {
            if !self.providers.contains_key(provider) {
                return Err(ConfigError::MissingProviderSection(provider.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
