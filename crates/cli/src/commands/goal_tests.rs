// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn criteria_from_text_assigns_sequential_ids() {
    let criteria = criteria_from_text(vec!["first".to_string(), "second".to_string()]);
    assert_eq!(criteria[0].id, "ac-1");
    assert_eq!(criteria[1].id, "ac-2");
    assert!(!criteria[0].met);
}

#[test]
fn short_truncates_long_ids() {
    assert_eq!(short("goal_1234567890"), "goal_12345");
    assert_eq!(short("g1"), "g1");
}
