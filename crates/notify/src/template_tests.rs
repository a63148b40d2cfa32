// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn render_simple_field() {
    let fields: HashMap<String, String> = [("name".to_string(), "mover".to_string())].into_iter().collect();
    assert_eq!(render("process {name} finished", &fields), "process mover finished");
}

#[test]
fn render_multiple_fields() {
    let fields: HashMap<String, String> =
        [("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())].into_iter().collect();
    assert_eq!(render("{a} + {b} = {a}{b}", &fields), "1 + 2 = 12");
}

#[test]
fn render_unknown_field_left_alone() {
    let fields: HashMap<String, String> = HashMap::new();
    assert_eq!(render("Hello {unknown}!", &fields), "Hello {unknown}!");
}

#[test]
fn render_no_placeholders() {
    let fields: HashMap<String, String> = HashMap::new();
    assert_eq!(render("no placeholders here", &fields), "no placeholders here");
}

#[test]
fn render_empty_braces_not_matched() {
    let fields: HashMap<String, String> = HashMap::new();
    assert_eq!(render("{}", &fields), "{}");
    assert_eq!(render("{", &fields), "{");
}
