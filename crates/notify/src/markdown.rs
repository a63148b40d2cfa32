// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MarkdownV2 escaping for provider payloads that render message text as
//! Markdown (e.g. a Telegram-shaped webhook). Escapes the fixed set of
//! characters MarkdownV2 treats as special.

const SPECIAL_CHARS: &[char] = &['_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '&'];

/// Escapes every MarkdownV2 special character with a leading backslash.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if SPECIAL_CHARS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
