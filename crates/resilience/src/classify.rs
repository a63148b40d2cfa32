// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Native error -> (category, severity) classification (§4.6).

use mover_status_core::{ErrorCategory, ErrorSeverity};
use std::io;

/// Classifies a `std::io::Error` per the fixed table in §4.6.
pub fn classify_io_error(err: &io::Error) -> (ErrorCategory, ErrorSeverity) {
    match err.kind() {
        io::ErrorKind::PermissionDenied => (ErrorCategory::Permission, ErrorSeverity::High),
        io::ErrorKind::TimedOut => (ErrorCategory::Timeout, ErrorSeverity::Medium),
        io::ErrorKind::OutOfMemory => (ErrorCategory::Resource, ErrorSeverity::Critical),
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::AddrInUse
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::BrokenPipe => (ErrorCategory::Network, ErrorSeverity::Medium),
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => (ErrorCategory::Validation, ErrorSeverity::Medium),
        io::ErrorKind::Other => (ErrorCategory::System, ErrorSeverity::High),
        _ => (ErrorCategory::Unknown, ErrorSeverity::Medium),
    }
}

/// Classification hint a caller can attach to an arbitrary error type
/// that does not carry an `io::ErrorKind` (e.g. a provider's HTTP
/// error, a config validation error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKindHint {
    Permission,
    Timeout,
    Resource,
    Network,
    Validation,
    System,
}

impl ErrorKindHint {
    pub fn classify(self) -> (ErrorCategory, ErrorSeverity) {
        match self {
            Self::Permission => (ErrorCategory::Permission, ErrorSeverity::High),
            Self::Timeout => (ErrorCategory::Timeout, ErrorSeverity::Medium),
            Self::Resource => (ErrorCategory::Resource, ErrorSeverity::Critical),
            Self::Network => (ErrorCategory::Network, ErrorSeverity::Medium),
            Self::Validation => (ErrorCategory::Validation, ErrorSeverity::Medium),
            Self::System => (ErrorCategory::System, ErrorSeverity::High),
        }
    }
}

/// Whether a category's recovery strategy is retry, per §4.6
/// ("network, timeout, resource -> retry policy; permission,
/// validation -> no retry; unknown -> escalate").
pub fn is_retryable(category: ErrorCategory) -> bool {
    matches!(category, ErrorCategory::Network | ErrorCategory::Timeout | ErrorCategory::Resource)
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
