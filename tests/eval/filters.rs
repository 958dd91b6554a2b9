//! Query constraints against the gallery.

use crate::common::{search, search_with, GALLERY, GALLERY_INDEX};
use tagsieve::{FacetSelection, TagIndex};

// ============================================================================
// TAGS
// ============================================================================

#[test]
fn empty_query_returns_everything_in_input_order() {
    assert_eq!(search(""), ["wave", "kitten", "ears", "dog", "road", "blank"]);
    assert_eq!(search("   "), search(""));
}

#[test]
fn parent_tags_match_through_ancestors() {
    assert_eq!(search("animal"), ["kitten", "ears", "dog"]);
    assert_eq!(search("cat"), ["kitten", "ears"]);
    assert_eq!(search("animal_ears"), ["ears"]);
}

#[test]
fn exclusions_apply_to_the_expanded_set() {
    assert_eq!(search("-animal"), ["wave", "road", "blank"]);
    assert_eq!(search("kitty -kitten"), ["ears"]);
    assert!(search("cat -cat").is_empty());
}

#[test]
fn raw_alias_tags_on_records_are_resolved() {
    assert_eq!(search("dog"), ["dog"]);
    assert_eq!(search("landscape_art"), ["road"]);
}

#[test]
fn flat_index_matches_only_literal_tags() {
    let flat = TagIndex::empty();
    let results = search_with("#kitten", &FacetSelection::default(), &GALLERY, &flat);
    assert_eq!(results, ["kitten"]);
    let results = search_with("#animal", &FacetSelection::default(), &GALLERY, &flat);
    assert!(results.is_empty());
}

#[test]
fn typed_directives_match_typed_tags_only() {
    assert_eq!(search("artist:hokusai"), ["wave"]);
    assert_eq!(search("a:Hiroshige"), ["road"]);
    assert_eq!(search("character:miku"), ["ears"]);
    assert_eq!(search("-ch:miku"), ["wave", "kitten", "dog", "road", "blank"]);
    // `sea` is an untyped tag
    assert!(search("artist:sea").is_empty());
}

// ============================================================================
// SCALARS AND RANGES
// ============================================================================

#[test]
fn collection_matches_case_insensitively() {
    assert_eq!(search("collection:prints"), ["wave", "road"]);
    assert_eq!(search("c:PETS"), ["kitten", "dog"]);
    assert!(search("c:nowhere").is_empty());
}

#[test]
fn orientation_and_size_use_stored_or_derived_values() {
    assert_eq!(search("orientation:landscape"), ["wave", "dog", "road"]);
    assert_eq!(search("ori:p"), ["kitten"]);
    assert_eq!(search("ori:square"), ["ears"]);
    assert_eq!(search("size:large"), ["wave", "road"]);
    assert_eq!(search("q:compact"), ["kitten", "dog"]);
    assert_eq!(search("q:xl"), ["ears"]);
}

#[test]
fn numeric_ranges_are_inclusive_and_need_the_field() {
    assert_eq!(search("w>=3000"), ["wave", "ears"]);
    assert_eq!(search("width:3000"), ["wave"]);
    assert_eq!(search("h<1500"), ["dog"]);
    assert_eq!(search("bytes>=3145728"), ["wave", "ears"]);
    assert_eq!(search("b<1000000"), ["kitten"]);
}

#[test]
fn malformed_directive_does_not_hide_results() {
    assert_eq!(search("width:wide cat"), ["kitten", "ears"]);
}

// ============================================================================
// DATES
// ============================================================================

#[test]
fn date_directives_cover_whole_spans() {
    assert_eq!(search("date:2024"), ["wave", "kitten", "ears"]);
    assert_eq!(search("date:2024-06"), ["kitten", "ears"]);
    assert_eq!(search("date:2024-06-28"), ["ears"]);
    assert_eq!(search("date:2023..2024-01"), ["wave", "dog"]);
}

#[test]
fn after_and_before_bound_one_side() {
    assert_eq!(search("before:2023"), ["dog", "road"]);
    assert_eq!(search("after:2024-06-25"), ["ears"]);
    assert_eq!(search("since:2024 until:2024-05"), ["wave"]);
}

#[test]
fn age_is_measured_from_now() {
    assert_eq!(search("age:7"), ["ears"]);
    assert_eq!(search("age:2w"), ["kitten", "ears"]);
    assert_eq!(search("age>180"), ["dog", "road"]);
    assert_eq!(search("age>365"), ["road"]);
}

#[test]
fn undated_records_fail_any_date_window() {
    assert!(!search("age:100000").contains(&"blank".to_string()));
    assert!(!search("date:1900..2100").contains(&"blank".to_string()));
}

// ============================================================================
// TEXT
// ============================================================================

#[test]
fn text_terms_search_title_description_and_raw_tags() {
    assert_eq!(search("great"), ["wave"]);
    assert_eq!(search("station"), ["road"]);
    assert_eq!(search("sea"), ["wave"]);
    assert_eq!(search("title:\"good boy\""), ["dog"]);
}

#[test]
fn text_exclusions() {
    assert_eq!(search("-print"), ["kitten", "ears", "dog", "road", "blank"]);
    assert_eq!(search("-desc:station -print"), ["kitten", "ears", "dog", "blank"]);
}

#[test]
fn gallery_index_is_shared_not_rebuilt() {
    assert!(GALLERY_INDEX.is_known("cat"));
}
