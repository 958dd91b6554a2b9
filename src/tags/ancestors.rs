// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ancestor traversal over the parent graph.
//!
//! Parent graphs come from hand-edited documents and are not guaranteed to be
//! acyclic. The walk keeps a visited set, so `a → b → a` terminates after
//! yielding `b` once.

use std::collections::{HashMap, HashSet};

use super::TagIndex;
use crate::utils::normalize_tag_name;

/// Transitive ancestors of `tag`, excluding `tag` itself.
///
/// Depth-first: each parent is followed by its own ancestors before the next
/// sibling parent. Duplicates are suppressed.
pub fn collect_ancestors(tag: &str, parent_map: &HashMap<String, Vec<String>>) -> Vec<String> {
    let mut chain = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(tag);

    // Explicit stack: a long chain must not exhaust the call stack
    let mut stack: Vec<&str> = Vec::new();
    if let Some(parents) = parent_map.get(tag) {
        stack.extend(parents.iter().rev().map(String::as_str));
    }
    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        chain.push(current.to_string());
        if let Some(parents) = parent_map.get(current) {
            stack.extend(
                parents
                    .iter()
                    .rev()
                    .map(String::as_str)
                    .filter(|parent| !visited.contains(parent)),
            );
        }
    }
    chain
}

/// Ancestors implied by `tags` that are not already among them.
///
/// Used by the tag editor to offer "add missing parents". Input tags are
/// normalized and alias-resolved; output is canonical, in discovery order.
pub fn find_missing_parents<S: AsRef<str>>(tags: &[S], index: &TagIndex) -> Vec<String> {
    let present: Vec<String> = tags
        .iter()
        .map(|tag| normalize_tag_name(tag.as_ref()))
        .filter(|tag| !tag.is_empty())
        .map(|tag| index.resolve(&tag))
        .collect();
    let present_set: HashSet<&str> = present.iter().map(String::as_str).collect();

    let mut missing = Vec::new();
    let mut seen = HashSet::new();
    for tag in &present {
        for ancestor in index.ancestors(tag) {
            if !present_set.contains(ancestor.as_str()) && seen.insert(ancestor.as_str()) {
                missing.push(ancestor.clone());
            }
        }
    }
    missing
}
