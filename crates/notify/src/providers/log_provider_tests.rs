// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn always_reports_success() {
    let provider = LogProvider::default();
    assert!(provider.validate_config().is_ok());
    let message = Message::builder("started", "mover is running").build();
    assert!(provider.send(&message).await.unwrap());
    assert_eq!(provider.name(), "log");
}
