// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ordering for `sort:` directives.
//!
//! Without a recognized sort key, results keep input order (callers pre-sort
//! their catalogs). All orderings are stable, so ties keep input order too.

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;

use super::cache::EvalCache;
use crate::tags::TagIndex;
use crate::types::ImageRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Newest,
    Oldest,
    Largest,
    Smallest,
    Random,
}

impl SortKey {
    /// Unknown keys return `None` and leave order unchanged.
    pub fn parse(key: &str) -> Option<Self> {
        let key = match key.trim().to_lowercase().as_str() {
            "new" | "newest" | "latest" | "desc" | "created" => SortKey::Newest,
            "old" | "oldest" | "asc" | "earliest" => SortKey::Oldest,
            "bytes" | "size" | "large" | "big" => SortKey::Largest,
            "small" | "tiny" => SortKey::Smallest,
            "random" | "rand" => SortKey::Random,
            _ => return None,
        };
        Some(key)
    }
}

/// Reorder `results` in place. `Random` shuffles with `rng` (Fisher-Yates).
pub fn sort_results<R>(
    results: &mut [&ImageRecord],
    key: SortKey,
    cache: &EvalCache,
    index: &TagIndex,
    rng: &mut R,
) where
    R: Rng + ?Sized,
{
    match key {
        SortKey::Newest => {
            results.sort_by_cached_key(|record| Reverse(cache.facts(record, index).created_millis()));
        }
        SortKey::Oldest => {
            results.sort_by_cached_key(|record| cache.facts(record, index).created_millis());
        }
        SortKey::Largest => results.sort_by_key(|record| Reverse(record.bytes.unwrap_or(0))),
        SortKey::Smallest => results.sort_by_key(|record| record.bytes.unwrap_or(0)),
        SortKey::Random => results.shuffle(rng),
    }
}
