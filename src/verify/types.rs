// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Structural checks for tag documents.
//!
//! `TagIndex::build` accepts anything and resolves conflicts silently (the last
//! alias registration wins, cycles are cut by the traversal). That keeps the
//! search box working on a bad document, but hides the mistakes. This module
//! finds them, so tooling can report what the index quietly papered over.
//!
//! | Finding             | What the index does with it                  |
//! |---------------------|----------------------------------------------|
//! | `ConflictingAlias`  | last registration wins                       |
//! | `AliasTargetMissing`| alias resolves to a tag with no entry        |
//! | `AliasWithParents`  | parents on an alias entry are ignored        |
//! | `SelfParent`        | self-link dropped                            |
//! | `UnknownParent`     | parent becomes a bare, entry-less tag        |
//! | `ParentCycle`       | traversal stops at the first repeat          |
//!
//! # Example
//!
//! ```ignore
//! for finding in validate_tag_document(&document.tags) {
//!     eprintln!("warning: {finding}");
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::tags::TagIndex;
use crate::types::TagRecord;
use crate::utils::normalize_tag_name;

/// Error type for tag document invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// The same spelling was registered against two canonical tags.
    ConflictingAlias {
        alias: String,
        first: String,
        second: String,
    },
    /// An alias points at a tag that has no entry of its own.
    AliasTargetMissing { alias: String, target: String },
    /// An alias entry lists parents; only canonical entries carry hierarchy.
    AliasWithParents { alias: String },
    /// A tag lists itself (or one of its own aliases) as a parent.
    SelfParent { tag: String },
    /// A parent name matches no tag or alias.
    UnknownParent { tag: String, parent: String },
    /// Following parents leads back to the start. Stored rotated so the
    /// smallest tag comes first.
    ParentCycle { cycle: Vec<String> },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::ConflictingAlias {
                alias,
                first,
                second,
            } => {
                write!(
                    f,
                    "alias '{}' registered for '{}' and again for '{}' (last wins)",
                    alias, first, second
                )
            }
            InvariantError::AliasTargetMissing { alias, target } => {
                write!(f, "alias '{}' points at '{}', which has no entry", alias, target)
            }
            InvariantError::AliasWithParents { alias } => {
                write!(f, "alias '{}' lists parents; they are ignored", alias)
            }
            InvariantError::SelfParent { tag } => {
                write!(f, "tag '{}' lists itself as a parent", tag)
            }
            InvariantError::UnknownParent { tag, parent } => {
                write!(f, "tag '{}' has unknown parent '{}'", tag, parent)
            }
            InvariantError::ParentCycle { cycle } => {
                let mut path = cycle.join(" → ");
                if let Some(first) = cycle.first() {
                    path.push_str(" → ");
                    path.push_str(first);
                }
                write!(f, "parent cycle: {}", path)
            }
        }
    }
}

impl std::error::Error for InvariantError {}

/// Every structural problem in a tag document, in document order (cycles last).
pub fn validate_tag_document(records: &[TagRecord]) -> Vec<InvariantError> {
    let mut errors = Vec::new();
    let mut owner: HashMap<String, String> = HashMap::new();
    let mut declared: HashSet<String> = HashSet::new();

    struct Entry {
        name: String,
        canonical: String,
        is_alias: bool,
        parents: Vec<String>,
    }
    let mut entries = Vec::new();

    for record in records {
        let name = normalize_tag_name(record.tag.as_deref().unwrap_or_default());
        if name.is_empty() {
            continue;
        }
        let alias_of = record
            .alias_of
            .as_deref()
            .map(normalize_tag_name)
            .filter(|target| !target.is_empty());
        let is_alias = alias_of.is_some();
        let canonical = alias_of.unwrap_or_else(|| name.clone());

        let spellings = std::iter::once(name.clone()).chain(
            record
                .aliases
                .iter()
                .map(|alias| normalize_tag_name(alias))
                .filter(|alias| !alias.is_empty()),
        );
        for spelling in spellings {
            if let Some(previous) = owner.get(&spelling) {
                if *previous != canonical {
                    errors.push(InvariantError::ConflictingAlias {
                        alias: spelling.clone(),
                        first: previous.clone(),
                        second: canonical.clone(),
                    });
                }
            }
            owner.insert(spelling, canonical.clone());
        }

        if !is_alias {
            declared.insert(canonical.clone());
        }
        entries.push(Entry {
            name,
            canonical,
            is_alias,
            parents: record
                .parents
                .iter()
                .map(|parent| normalize_tag_name(parent))
                .filter(|parent| !parent.is_empty())
                .collect(),
        });
    }

    for entry in &entries {
        if entry.is_alias {
            if !declared.contains(&entry.canonical) {
                errors.push(InvariantError::AliasTargetMissing {
                    alias: entry.name.clone(),
                    target: entry.canonical.clone(),
                });
            }
            if !entry.parents.is_empty() {
                errors.push(InvariantError::AliasWithParents {
                    alias: entry.name.clone(),
                });
            }
            continue;
        }
        for parent in &entry.parents {
            match owner.get(parent) {
                Some(resolved) if *resolved == entry.canonical => {
                    errors.push(InvariantError::SelfParent {
                        tag: entry.canonical.clone(),
                    });
                }
                Some(_) => {}
                None => errors.push(InvariantError::UnknownParent {
                    tag: entry.canonical.clone(),
                    parent: parent.clone(),
                }),
            }
        }
    }

    let index = TagIndex::build(records);
    errors.extend(
        find_parent_cycles(&index)
            .into_iter()
            .map(|cycle| InvariantError::ParentCycle { cycle }),
    );
    errors
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

/// Distinct cycles in the index's parent graph.
///
/// Iterative DFS with three colors; a back edge to an in-progress tag closes
/// a cycle made of the stack suffix starting at that tag.
pub fn find_parent_cycles(index: &TagIndex) -> Vec<Vec<String>> {
    let mut state: HashMap<&str, Visit> = HashMap::new();
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut cycles = Vec::new();

    for root in index.canonical_tags() {
        if state.contains_key(root.as_str()) {
            continue;
        }
        state.insert(root.as_str(), Visit::InProgress);
        let mut stack: Vec<(&str, usize)> = vec![(root.as_str(), 0)];

        while let Some(&(node, next)) = stack.last() {
            let Some(parent) = index.parents(node).get(next) else {
                state.insert(node, Visit::Done);
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            match state.get(parent.as_str()) {
                None => {
                    state.insert(parent.as_str(), Visit::InProgress);
                    stack.push((parent.as_str(), 0));
                }
                Some(Visit::InProgress) => {
                    let start = stack
                        .iter()
                        .position(|(tag, _)| *tag == parent.as_str())
                        .unwrap_or(0);
                    let mut cycle: Vec<String> =
                        stack[start..].iter().map(|(tag, _)| tag.to_string()).collect();
                    if let Some(min) = cycle
                        .iter()
                        .enumerate()
                        .min_by(|a, b| a.1.cmp(b.1))
                        .map(|(i, _)| i)
                    {
                        cycle.rotate_left(min);
                    }
                    if seen.insert(cycle.clone()) {
                        cycles.push(cycle);
                    }
                }
                Some(Visit::Done) => {}
            }
        }
    }
    cycles
}
