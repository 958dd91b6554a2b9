// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ambiguous-prefix resolution.
//!
//! Typing `cat_e` should find `cat_ears` without the user finishing the word,
//! but `ca` must not silently pick one of `cat`, `car` and `castle`. A prefix
//! resolves only when every spelling starting with it points at the same
//! canonical tag.
//!
//! The scan is linear in the vocabulary, and the same prefixes come back on
//! every keystroke, so answers (including "no unique match") are memoized for
//! the lifetime of the index. The index is immutable, so the memo never goes
//! stale.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Shortest prefix that is ever resolved.
pub const PREFIX_MIN_LEN: usize = 2;

/// Canonical tag shared by every spelling starting with `prefix`, if there is
/// exactly one.
pub(crate) fn unique_prefix_match<'a, I>(spellings: I, prefix: &str) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut found: Option<&str> = None;
    for (spelling, canonical) in spellings {
        if !spelling.starts_with(prefix) {
            continue;
        }
        match found {
            None => found = Some(canonical),
            Some(existing) if existing == canonical => {}
            Some(_) => return None,
        }
    }
    found.map(str::to_string)
}

/// Memo of prefix → resolution. Shared reads, exclusive writes.
#[derive(Debug, Default)]
pub(crate) struct PrefixCache {
    entries: RwLock<HashMap<String, Option<String>>>,
}

impl PrefixCache {
    pub(crate) fn get_or_compute<F>(&self, prefix: &str, compute: F) -> Option<String>
    where
        F: FnOnce() -> Option<String>,
    {
        if let Some(hit) = self.entries.read().get(prefix) {
            return hit.clone();
        }
        let resolved = compute();
        self.entries
            .write()
            .insert(prefix.to_string(), resolved.clone());
        resolved
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}
