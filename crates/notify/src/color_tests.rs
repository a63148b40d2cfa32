// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    low = { Priority::Low, 0x00FF00 },
    normal = { Priority::Normal, 0x0099FF },
    high = { Priority::High, 0xFF9900 },
    urgent = { Priority::Urgent, 0xFF0000 },
)]
fn priority_color_matches_map(priority: Priority, expected: u32) {
    assert_eq!(priority_color(priority), expected);
}
