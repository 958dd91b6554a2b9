//! Shared test utilities and fixtures.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::LazyLock;
use tagsieve::{evaluate_at, parse_query, FacetSelection, ImageRecord, SearchDocument, TagIndex};

// Re-export canonical test utilities from tagsieve::testing
pub use tagsieve::testing::{alias, child, image, image_dated, image_sized, tag, typed, uuids};

// ============================================================================
// GALLERY FIXTURE
// ============================================================================

/// A small but realistic tag document: a two-level hierarchy, aliases with
/// mixed case and whitespace, typed tags, and one alias-of redirect entry.
pub const GALLERY_TAGS: &str = r##"{
  "tags": [
    {"tag": "animal", "slug": "animal"},
    {"tag": "cat", "parents": ["animal"], "aliases": ["Kitty", "neko"]},
    {"tag": "kitten", "parents": ["cat"]},
    {"tag": "dog", "parents": ["animal"], "aliases": ["doggo"]},
    {"tag": "animal_ears"},
    {"tag": "cat_ears", "parents": ["animal_ears", "cat"]},
    {"tag": "nekomimi", "alias_of": "cat_ears"},
    {"tag": "landscape_art", "aliases": ["scenery"]},
    {"tag": "hokusai", "type": "Artist"},
    {"tag": "hiroshige", "type": "artist"},
    {"tag": "miku", "type": "character", "aliases": ["hatsune miku"]},
    {"tag": "#sunset"}
  ]
}"##;

pub const GALLERY_IMAGES: &str = r#"{
  "images": [
    {"uuid": "wave", "title": "The Great Wave", "description": "Woodblock print",
     "tags": ["hokusai", "sea"], "collection": "Prints", "width": 3000, "height": 2000,
     "bytes": 3145728, "created_at": "2024-01-10T08:00:00Z", "favorited_at": "2024-02-01"},
    {"uuid": "kitten", "title": "Sleepy kitten", "tags": ["kitten"], "collection": "Pets",
     "width": 1200, "height": 1600, "bytes": 524288, "created_at": "2024-06-20"},
    {"uuid": "ears", "title": "Cosplay", "tags": ["nekomimi", "miku"], "collection": "Cosplay",
     "width": 4000, "height": 4000, "bytes": 8388608, "created_at": "2024-06-28T21:30:00Z"},
    {"uuid": "dog", "title": "Good boy", "tags": ["doggo"], "collection": "Pets",
     "width": "1920", "height": "1080", "created_at": "2023-11-05"},
    {"uuid": "road", "title": "Tokaido road", "description": "Station 53",
     "tags": ["hiroshige", "scenery", "sunset"], "collection": "prints",
     "orientation": "landscape", "size_bucket": "Large", "created_at": "2022-03-01"},
    {"uuid": "blank", "tags": []}
  ],
  "tags": [{"tag": "cat", "slug": "cat"}]
}"#;

pub static GALLERY_INDEX: LazyLock<TagIndex> = LazyLock::new(|| TagIndex::from_json_str(GALLERY_TAGS));

pub static GALLERY: LazyLock<Vec<ImageRecord>> = LazyLock::new(|| {
    SearchDocument::from_json_str(GALLERY_IMAGES)
        .expect("gallery fixture is valid")
        .images
});

/// Evaluation time for every fixture-based test.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

// ============================================================================
// QUERY HELPERS
// ============================================================================

/// Run `query` over `records` with the fixed clock and a seeded RNG.
pub fn search_with(
    query: &str,
    facets: &FacetSelection,
    records: &[ImageRecord],
    index: &TagIndex,
) -> Vec<String> {
    let parsed = parse_query(query, index);
    let results = evaluate_at(
        records,
        &parsed,
        facets,
        index,
        now(),
        &mut StdRng::seed_from_u64(42),
    );
    uuids(&results)
}

/// Run `query` over the gallery fixture.
pub fn search(query: &str) -> Vec<String> {
    search_with(query, &FacetSelection::default(), &GALLERY, &GALLERY_INDEX)
}

/// Run `query` over the gallery fixture with facet selections.
pub fn search_faceted(query: &str, facets: &FacetSelection) -> Vec<String> {
    search_with(query, facets, &GALLERY, &GALLERY_INDEX)
}
