// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Facet counts for the sidebar pickers (artists, characters, months).

use std::collections::HashMap;

use serde::Serialize;

use super::cache::EvalCache;
use crate::tags::TagIndex;
use crate::types::ImageRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCounts {
    /// Most frequent artists first, capped at `artist_limit`.
    pub artists: Vec<FacetCount>,
    /// All characters, most frequent first.
    pub characters: Vec<FacetCount>,
    /// Newest month first.
    pub months: Vec<FacetCount>,
}

/// Count artists, characters and months over `records`.
///
/// Ties in count are broken by key so the output is deterministic.
pub fn facet_counts(
    records: &[ImageRecord],
    index: &TagIndex,
    cache: &EvalCache,
    artist_limit: usize,
) -> FacetCounts {
    let mut artists: HashMap<String, usize> = HashMap::new();
    let mut characters: HashMap<String, usize> = HashMap::new();
    let mut months: HashMap<String, usize> = HashMap::new();

    for record in records {
        let facts = cache.facts(record, index);
        for artist in &facts.artists {
            *artists.entry(artist.clone()).or_default() += 1;
        }
        for character in &facts.characters {
            *characters.entry(character.clone()).or_default() += 1;
        }
        if let Some(month) = &facts.month {
            *months.entry(month.clone()).or_default() += 1;
        }
    }

    let mut artists = by_count(artists);
    artists.truncate(artist_limit);
    let mut months: Vec<FacetCount> = months
        .into_iter()
        .map(|(key, count)| FacetCount { key, count })
        .collect();
    months.sort_by(|a, b| b.key.cmp(&a.key));

    FacetCounts {
        artists,
        characters: by_count(characters),
        months,
    }
}

fn by_count(counts: HashMap<String, usize>) -> Vec<FacetCount> {
    let mut entries: Vec<FacetCount> = counts
        .into_iter()
        .map(|(key, count)| FacetCount { key, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    entries
}
