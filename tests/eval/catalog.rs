//! Long-lived search sessions.

use crate::common::{now, GALLERY, GALLERY_TAGS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tagsieve::testing::{image, uuids};
use tagsieve::{
    evaluate_cached, parse_query, Catalog, EngineOptions, EvalCache, FacetSelection,
    SearchDocument, TagIndex,
};

fn gallery_catalog() -> Catalog {
    Catalog::new(TagIndex::from_json_str(GALLERY_TAGS), GALLERY.clone())
}

fn search(catalog: &mut Catalog, query: &str, facets: &FacetSelection) -> Vec<String> {
    let results = catalog.search_at(query, facets, now(), &mut StdRng::seed_from_u64(5));
    uuids(&results)
}

#[test]
fn catalog_matches_one_shot_evaluation() {
    let mut catalog = gallery_catalog();
    for query in ["animal", "-animal", "c:pets sort:new", "age:2w", "great", ""] {
        assert_eq!(
            search(&mut catalog, query, &FacetSelection::default()),
            crate::common::search(query),
            "{query}"
        );
    }
}

#[test]
fn records_without_uuid_are_evaluated_but_not_cached() {
    let mut catalog = gallery_catalog();
    assert_eq!(catalog.cache().len(), GALLERY.len());

    let mut anonymous = image("", &["kitten"]);
    anonymous.uuid = None;
    catalog.replace_images(vec![anonymous, image("named", &["dog"])]);
    assert_eq!(catalog.cache().len(), 1);
    let results = catalog.search_at("animal", &FacetSelection::default(), now(), &mut StdRng::seed_from_u64(1));
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].uuid, None);
}

#[test]
fn replacing_images_from_a_document() {
    let mut catalog = gallery_catalog();
    let document = SearchDocument::from_json_str(
        r#"{"images": [{"uuid": "n1", "tags": ["neko"]}, {"uuid": "n2", "tags": ["sky"]}]}"#,
    )
    .unwrap();
    catalog.replace_images(document.images);
    assert_eq!(search(&mut catalog, "animal", &FacetSelection::default()), ["n1"]);
    assert_eq!(catalog.images().len(), 2);
}

#[test]
fn replacing_the_index_reexpands_records() {
    let mut catalog = gallery_catalog();
    assert_eq!(search(&mut catalog, "animal", &FacetSelection::default()), ["kitten", "ears", "dog"]);

    catalog.replace_tag_index(TagIndex::from_json_str(r#"{"tags": [{"tag": "animal"}]}"#));
    assert!(search(&mut catalog, "animal", &FacetSelection::default()).is_empty());
    assert_eq!(search(&mut catalog, "doggo", &FacetSelection::default()), ["dog"]);
}

#[test]
fn options_flow_into_parsing_and_suggestions() {
    let mut catalog = gallery_catalog();
    assert_eq!(catalog.parse("hiro").include_tags, ["hiroshige"]);
    assert_eq!(catalog.resolve_prefix("Hoku").as_deref(), Some("hokusai"));

    catalog.set_options(EngineOptions {
        prefix_matching: false,
        suggestion_limit: 1,
        ..EngineOptions::default()
    });
    assert_eq!(catalog.parse("hiro").text_terms, ["hiro"]);
    assert_eq!(catalog.suggest("neko", &[]), ["cat"]);
    // still matches as free text against the raw tag
    assert_eq!(search(&mut catalog, "hiro", &FacetSelection::default()), ["road"]);
}

#[test]
fn catalog_facet_counts_track_replacements() {
    let mut catalog = gallery_catalog();
    assert_eq!(catalog.facet_counts().artists.len(), 2);
    catalog.replace_images(vec![image("solo", &["hokusai"])]);
    let counts = catalog.facet_counts();
    assert_eq!(counts.artists.len(), 1);
    assert!(counts.months.is_empty());
}

#[test]
fn stale_cache_never_changes_results() {
    let index = TagIndex::from_json_str(GALLERY_TAGS);
    let mut records = GALLERY.clone();
    let mut cache = EvalCache::new();
    cache.prepare(&records, &index);

    records[0].tags = vec!["kitten".into()];
    let query = parse_query("cat", &index);
    let results = evaluate_cached(
        &records,
        &query,
        &FacetSelection::default(),
        &index,
        &cache,
        now(),
        &mut StdRng::seed_from_u64(9),
    );
    assert_eq!(uuids(&results), ["wave", "kitten", "ears"]);
}
