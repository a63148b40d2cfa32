// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PID-file lifecycle watcher (§4.2).
//!
//! Polls a PID file on a fixed interval and emits `created`/`modified`/
//! `deleted` transitions, offloading the stat+read onto the blocking
//! pool each tick and cross-validating liveness against the platform
//! process table via [`crate::process_probe::probe_alive`]. Runs until
//! cancelled; the watcher retains no state beyond "did the file exist
//! last tick" and "what pid did it hold".

use crate::process_probe::probe_alive;
use mover_status_core::{Clock, PidFileEvent};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("watcher cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawState {
    exists: bool,
    pid: Option<u32>,
}

impl RawState {
    const ABSENT: Self = Self { exists: false, pid: None };
}

/// Reads the PID file's raw presence/content. Never panics: a missing
/// file is `ABSENT`; unreadable content yields `exists: true, pid: None`.
fn read_state(path: &std::path::Path) -> RawState {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let pid = contents.trim().parse::<u32>().ok().filter(|&p| p > 0);
            RawState { exists: true, pid }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => RawState::ABSENT,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "pid watcher: cannot read pid file contents, treating as present with no pid");
            RawState { exists: true, pid: None }
        }
    }
}

/// Polling PID-file watcher. Holds only the previous observation; the
/// consumer is expected to drive it from a spawned task reading its
/// event channel.
pub struct PidWatcher<C: Clock> {
    path: PathBuf,
    interval: Duration,
    clock: C,
    previous: Option<RawState>,
}

impl<C: Clock> PidWatcher<C> {
    pub fn new(path: PathBuf, interval: Duration, clock: C) -> Self {
        Self { path, interval, clock, previous: None }
    }

    /// Runs until `cancel` fires, sending each transition on `tx`. A
    /// closed receiver is treated the same as cancellation: the loop
    /// exits cleanly rather than panicking on a failed send.
    pub async fn run(mut self, tx: mpsc::Sender<PidFileEvent>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.interval) => {}
            }
            if cancel.is_cancelled() {
                return;
            }
            if let Some(event) = self.tick().await {
                if tx.send(event).await.is_err() {
                    return;
                }
            }
        }
    }

    /// Performs one poll, offloaded to the blocking pool, and returns
    /// the transition event if state changed (§4.2 algorithm).
    pub async fn tick(&mut self) -> Option<PidFileEvent> {
        let path = self.path.clone();
        let state = match tokio::task::spawn_blocking(move || read_state(&path)).await {
            Ok(state) => state,
            Err(join_err) => {
                warn!(error = %join_err, "pid watcher: worker task failed, treating as absent");
                RawState::ABSENT
            }
        };
        let now_ms = self.clock.epoch_ms();

        let event = match self.previous {
            None => None,
            Some(prev) => self.transition(prev, state, now_ms).await,
        };
        self.previous = Some(state);
        event
    }

    async fn transition(&self, prev: RawState, next: RawState, now_ms: u64) -> Option<PidFileEvent> {
        match (prev.exists, next.exists) {
            (false, true) => {
                if let Some(pid) = next.pid {
                    if !probe_alive(pid).await {
                        warn!(pid, "pid watcher: pid file appeared but process is not alive");
                    }
                } else {
                    warn!("pid watcher: pid file appeared with unparseable content");
                }
                Some(PidFileEvent::created(next.pid, now_ms))
            }
            (true, false) => Some(PidFileEvent::deleted(now_ms)),
            (true, true) if prev.pid != next.pid => next.pid.map(|pid| PidFileEvent::modified(pid, now_ms)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "pid_watcher_tests.rs"]
mod tests;
