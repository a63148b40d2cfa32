// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn pid_zero_is_never_alive() {
    // pid 0 never occurs on a real process table; the probe should not
    // mistake it for "alive" even on the non-Linux fallback path.
    #[cfg(target_os = "linux")]
    assert!(!probe_alive(0).await);
}

#[tokio::test]
async fn current_process_is_alive_on_linux() {
    #[cfg(target_os = "linux")]
    {
        let pid = std::process::id();
        assert!(probe_alive(pid).await);
    }
}

#[tokio::test]
async fn implausible_pid_is_not_alive_on_linux() {
    #[cfg(target_os = "linux")]
    assert!(!probe_alive(u32::MAX - 1).await);
}
