// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for query parsing and evaluation.
//!
//! The search box is fed on every keystroke, so half-typed directives,
//! unbalanced quotes, emoji and huge numbers all reach the parser. None of
//! it may panic, and evaluation must only ever return records it was given.

#![no_main]

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tagsieve::{evaluate_at, parse_query, FacetSelection, ImageRecord, SearchDocument, TagIndex};

const TAGS: &str = r#"{"tags": [
    {"tag": "animal"},
    {"tag": "cat", "parents": ["animal"], "aliases": ["neko", "kitty"]},
    {"tag": "cat_ears", "parents": ["animal_ears", "cat"]},
    {"tag": "animal_ears", "parents": ["cat_ears"]},
    {"tag": "hokusai", "type": "artist"},
    {"tag": "miku", "type": "character"}
]}"#;

const IMAGES: &str = r#"{"images": [
    {"uuid": "a", "tags": ["neko"], "width": 4000, "height": 3000, "created_at": "2024-06-01"},
    {"uuid": "b", "tags": ["hokusai"], "width": "1200", "bytes": 10, "created_at": 0},
    {"uuid": "c", "tags": ["cat_ears", "miku"], "orientation": "square", "favorited_at": "garbage"},
    {"tags": [], "collection": "Pets"}
]}"#;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    query: &'a str,
    collection: Option<&'a str>,
    orientation: Option<&'a str>,
    days: Option<u64>,
    tag: Option<&'a str>,
    month: Option<&'a str>,
    seed: u64,
}

fuzz_target!(|input: Input<'_>| {
    static STATE: std::sync::OnceLock<(TagIndex, Vec<ImageRecord>)> = std::sync::OnceLock::new();
    let (index, images) = STATE.get_or_init(|| {
        let document = SearchDocument::from_json_str(IMAGES).expect("fixture is valid");
        (TagIndex::from_json_str(TAGS), document.images)
    });

    let parsed = parse_query(input.query, index);

    // Parsed lists are normalized: nothing empty survives
    for tag in parsed.include_tags.iter().chain(&parsed.exclude_tags) {
        assert!(!tag.is_empty(), "empty tag from {:?}", input.query);
    }

    let facets = FacetSelection {
        collection: input.collection.map(str::to_string),
        orientation: input.orientation.map(str::to_string),
        time_window_days: input.days,
        tag: input.tag.map(str::to_string),
        month: input.month.map(str::to_string),
        ..Default::default()
    };
    let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
    let results = evaluate_at(
        images,
        &parsed,
        &facets,
        index,
        now,
        &mut StdRng::seed_from_u64(input.seed),
    );
    assert!(results.len() <= images.len());
});
