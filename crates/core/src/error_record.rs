// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error classification records shared across components.
//!
//! A `native error kind -> (category, severity)` classification table
//! lives in `mover-status-resilience::classify`; this module only
//! carries the resulting record as plain data so every crate (sampler,
//! engine, notify) can construct and pass one without depending on the
//! resilience crate.

use crate::define_id;
use serde::{Deserialize, Serialize};

define_id! {
    pub struct ErrorRecordId("err-");
}

/// Classification bucket for a native error, per the fixed classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Permission,
    Timeout,
    Resource,
    Network,
    Validation,
    System,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Permission => "permission",
            Self::Timeout => "timeout",
            Self::Resource => "resource",
            Self::Network => "network",
            Self::Validation => "validation",
            Self::System => "system",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified, sanitized error, ready to cross component boundaries
/// (event bus payload, log field, delivery tracker entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub id: ErrorRecordId,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    /// Already passed through the sanitizing filter.
    pub message: String,
    pub context: String,
    pub timestamp_ms: u64,
}

impl ErrorRecord {
    pub fn new(
        category: ErrorCategory,
        severity: ErrorSeverity,
        message: impl Into<String>,
        context: impl Into<String>,
        timestamp_ms: u64,
    ) -> Self {
        Self { id: ErrorRecordId::new(), category, severity, message: message.into(), context: context.into(), timestamp_ms }
    }

    /// Escalates if severity is critical; repetition-based escalation
    /// (count within a sliding window) is decided by the caller, which
    /// holds the window state this record alone cannot see.
    pub fn is_critical(&self) -> bool {
        self.severity == ErrorSeverity::Critical
    }
}

#[cfg(test)]
#[path = "error_record_tests.rs"]
mod tests;
