// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query tokenizer: whitespace splitting with double-quote grouping.
//!
//! Quotes toggle a "keep whitespace" mode and are themselves dropped, so
//! `tag:"cat ears"` becomes the single token `tag:cat ears`. An unterminated
//! quote runs to the end of input. Empty (or all-whitespace) tokens are never
//! emitted.

pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in input.chars() {
        if ch == '"' {
            quoted = !quoted;
            continue;
        }
        if ch.is_whitespace() && !quoted {
            flush(&mut tokens, &mut current);
            continue;
        }
        current.push(ch);
    }
    flush(&mut tokens, &mut current);
    tokens
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    let token = std::mem::take(current);
    if !token.trim().is_empty() {
        tokens.push(token);
    }
}
