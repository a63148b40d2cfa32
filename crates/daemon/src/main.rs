// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `mover-statusd`: reads an optional config path (default
//! `./mover-status.toml`), wires the component graph, and runs until
//! `Ctrl-C`. No `clap` -- argument parsing beyond this single
//! positional path is out of scope (§1).

use mover_status_daemon::config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    mover_status_daemon::logging::install();

    let config_path = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("mover-statusd: received interrupt, shutting down");
            shutdown.cancel();
        }
    });

    info!(path = %config_path.display(), "mover-statusd: starting");
    if let Err(err) = mover_status_daemon::run(&config_path, cancel).await {
        error!(error = %err, "mover-statusd: exiting on error");
        std::process::exit(1);
    }
}
