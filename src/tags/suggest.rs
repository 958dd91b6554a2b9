// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tag suggestions for the tag editor and search box.
//!
//! Ranking is by match quality, not popularity:
//!
//! | Rank | Match                                   |
//! |------|-----------------------------------------|
//! | 0    | exact alias hit → its canonical tag     |
//! | 1    | a spelling starts with the query        |
//! | 2    | a spelling contains the query           |
//! | 3    | a canonical tag starts with the query   |
//! | 4    | a canonical tag contains the query      |
//!
//! Every suggestion is canonical, appears once, and is never one of the tags
//! the caller already has.

use std::collections::HashSet;

use super::TagIndex;
use crate::utils::{normalize_tag_name, push_unique};

/// Default cap on suggestions.
pub const SUGGESTION_LIMIT: usize = 8;

struct Suggestions<'a> {
    existing: HashSet<&'a str>,
    added: HashSet<String>,
    out: Vec<String>,
    limit: usize,
}

impl Suggestions<'_> {
    fn is_full(&self) -> bool {
        self.out.len() >= self.limit
    }

    fn push(&mut self, tag: &str) {
        if self.is_full() || tag.is_empty() || self.existing.contains(tag) {
            return;
        }
        if self.added.insert(tag.to_string()) {
            self.out.push(tag.to_string());
        }
    }
}

/// Suggest canonical tags for a partially typed `query`.
///
/// `existing` holds canonical tags already attached (they are never suggested).
pub fn suggest_tags<S: AsRef<str>>(
    query: &str,
    index: &TagIndex,
    existing: &[S],
    limit: usize,
) -> Vec<String> {
    let normalized = normalize_tag_name(query);
    if normalized.is_empty() || limit == 0 {
        return Vec::new();
    }
    let mut suggestions = Suggestions {
        existing: existing.iter().map(|tag| tag.as_ref()).collect(),
        added: HashSet::new(),
        out: Vec::new(),
        limit,
    };

    if let Some(canonical) = index.canonical_of(&normalized) {
        if canonical != normalized {
            suggestions.push(canonical);
        }
    }
    for (spelling, canonical) in index.spellings() {
        if spelling.starts_with(&normalized) {
            suggestions.push(canonical);
        }
    }
    for (spelling, canonical) in index.spellings() {
        if spelling.contains(&normalized) {
            suggestions.push(canonical);
        }
    }
    for tag in index.canonical_tags() {
        if tag.starts_with(&normalized) {
            suggestions.push(tag);
        }
    }
    for tag in index.canonical_tags() {
        if tag.contains(&normalized) {
            suggestions.push(tag);
        }
    }
    suggestions.out
}

/// Split free-form tag input into normalized, deduplicated tags.
///
/// With a `#` anywhere, each `#` starts a new tag (so `#cat ears #sky` keeps
/// the space in `cat ears`). Otherwise commas, pipes and whitespace separate.
pub fn parse_tag_input(value: &str) -> Vec<String> {
    let parts: Vec<&str> = if value.contains('#') {
        value.split('#').collect()
    } else {
        value
            .split(|c: char| c == ',' || c == '|' || c.is_whitespace())
            .collect()
    };
    let mut tags = Vec::new();
    for part in parts {
        let cleaned = normalize_tag_name(part);
        if !cleaned.is_empty() {
            push_unique(&mut tags, cleaned);
        }
    }
    tags
}
