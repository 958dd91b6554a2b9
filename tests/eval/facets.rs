//! UI facet selections and facet counts.

use crate::common::{search_faceted, GALLERY, GALLERY_INDEX};
use tagsieve::{facet_counts, EvalCache, FacetCount, FacetSelection};

fn facets() -> FacetSelection {
    FacetSelection::default()
}

#[test]
fn collection_and_orientation_pills() {
    let pets = FacetSelection {
        collection: Some("Pets".into()),
        ..facets()
    };
    assert_eq!(search_faceted("", &pets), ["kitten", "dog"]);

    let portrait = FacetSelection {
        orientation: Some("portrait".into()),
        ..facets()
    };
    assert_eq!(search_faceted("", &portrait), ["kitten"]);
}

#[test]
fn all_and_empty_selections_are_unfiltered() {
    let everything = FacetSelection {
        collection: Some("All".into()),
        orientation: Some(String::new()),
        size: Some("all".into()),
        tag: Some("  ".into()),
        ..facets()
    };
    assert_eq!(search_faceted("", &everything).len(), GALLERY.len());
}

#[test]
fn directives_take_precedence_over_facets() {
    let pets = FacetSelection {
        collection: Some("pets".into()),
        orientation: Some("portrait".into()),
        ..facets()
    };
    assert!(search_faceted("collection:prints", &pets).is_empty());
    assert_eq!(search_faceted("collection:prints ori:landscape", &pets), ["wave", "road"]);
}

#[test]
fn facets_and_query_are_conjoined() {
    let pets = FacetSelection {
        collection: Some("pets".into()),
        ..facets()
    };
    assert_eq!(search_faceted("animal -dog", &pets), ["kitten"]);
}

#[test]
fn time_window_is_relative_to_now() {
    let month = FacetSelection {
        time_window_days: Some(30),
        ..facets()
    };
    assert_eq!(search_faceted("", &month), ["kitten", "ears"]);

    // narrower of the directive and the pill wins
    assert_eq!(search_faceted("age:7", &month), ["ears"]);
}

#[test]
fn pickers_resolve_through_the_index() {
    let tag = FacetSelection {
        tag: Some("Kitty".into()),
        ..facets()
    };
    assert_eq!(search_faceted("", &tag), ["kitten", "ears"]);

    let artist = FacetSelection {
        artist: Some("Hiroshige".into()),
        ..facets()
    };
    assert_eq!(search_faceted("", &artist), ["road"]);

    let character = FacetSelection {
        character: Some("Hatsune Miku".into()),
        ..facets()
    };
    assert_eq!(search_faceted("", &character), ["ears"]);
}

#[test]
fn month_facet_prefers_the_favorite_date() {
    let june = FacetSelection {
        month: Some("2024-06".into()),
        ..facets()
    };
    assert_eq!(search_faceted("", &june), ["kitten", "ears"]);

    let february = FacetSelection {
        month: Some("2024-02".into()),
        ..facets()
    };
    assert_eq!(search_faceted("", &february), ["wave"]);

    let january = FacetSelection {
        month: Some("2024-01".into()),
        ..facets()
    };
    assert!(search_faceted("", &january).is_empty());
}

#[test]
fn facet_selection_decodes_from_page_state() {
    let selection: FacetSelection =
        serde_json::from_str(r#"{"collection": "all", "time": "30", "artist": "hokusai"}"#).unwrap();
    assert_eq!(selection.time_window_days, Some(30));
    assert_eq!(search_faceted("", &selection), ["wave"]);
}

#[test]
fn counts_over_the_gallery() {
    let mut cache = EvalCache::new();
    cache.prepare(&GALLERY, &GALLERY_INDEX);
    let counts = facet_counts(&GALLERY, &GALLERY_INDEX, &cache, 10);

    assert_eq!(
        counts.artists,
        [
            FacetCount { key: "hiroshige".into(), count: 1 },
            FacetCount { key: "hokusai".into(), count: 1 },
        ]
    );
    assert_eq!(counts.characters, [FacetCount { key: "miku".into(), count: 1 }]);
    assert_eq!(
        counts.months,
        [
            FacetCount { key: "2024-06".into(), count: 2 },
            FacetCount { key: "2024-02".into(), count: 1 },
            FacetCount { key: "2023-11".into(), count: 1 },
            FacetCount { key: "2022-03".into(), count: 1 },
        ]
    );
}

#[test]
fn counts_work_without_a_warm_cache() {
    let cold = facet_counts(&GALLERY, &GALLERY_INDEX, &EvalCache::new(), 1);
    assert_eq!(cold.artists.len(), 1);
    assert_eq!(cold.months.len(), 4);
}
