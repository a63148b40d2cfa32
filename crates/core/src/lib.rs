// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mover-status-core: shared data model, IDs, clock, correlation context,
//! and event bus for the mover-status monitor.

pub mod circuit;
pub mod clock;
pub mod config;
pub mod correlation;
pub mod delivery;
pub mod error_record;
pub mod event_bus;
pub mod id;
pub mod message;
pub mod monitor_event;
pub mod pid_event;
pub mod process_info;
pub mod progress;
pub mod sample;
pub mod state;
pub mod token_bucket;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use circuit::{BreakerStatus, CircuitBreakerState};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError, MonitoringConfig, NotificationsConfig, ProcessConfig, ProgressConfig, RateLimitConfig};
pub use correlation::CorrelationId;
pub use delivery::{DeliveryOutcome, DeliveryStatus, ProviderResult};
pub use error_record::{ErrorCategory, ErrorRecord, ErrorRecordId, ErrorSeverity};
pub use event_bus::{EventBus, Subscription, SubscriptionId, Topic};
pub use message::{Message, MessageBuilder, MetadataValue, Priority, QueuedMessage};
pub use monitor_event::MonitorEvent;
pub use pid_event::{PidEventKind, PidFileEvent};
pub use process_info::{ProcessInfo, ProcessStatus};
pub use progress::{ProgressError, ProgressMetrics};
pub use sample::DiskSample;
pub use state::{ContextValue, MonitorState, StateSnapshot};
pub use token_bucket::TokenBucket;
