//! `sort:` keys over the gallery.

use crate::common::{now, search, GALLERY, GALLERY_INDEX};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tagsieve::{evaluate_at, parse_query, FacetSelection};

#[test]
fn newest_and_oldest() {
    assert_eq!(
        search("sort:new"),
        ["ears", "kitten", "wave", "dog", "road", "blank"]
    );
    assert_eq!(
        search("sort:oldest"),
        ["blank", "road", "dog", "wave", "kitten", "ears"]
    );
}

#[test]
fn largest_first_with_missing_sizes_in_input_order() {
    assert_eq!(
        search("sort:big"),
        ["ears", "wave", "kitten", "dog", "road", "blank"]
    );
    assert_eq!(
        search("sort:small"),
        ["dog", "road", "blank", "kitten", "wave", "ears"]
    );
}

#[test]
fn sort_only_reorders_matches() {
    assert_eq!(search("animal sort:old"), ["dog", "kitten", "ears"]);
    assert_eq!(search("sort:new c:pets"), ["kitten", "dog"]);
}

#[test]
fn unknown_sort_key_keeps_input_order() {
    assert_eq!(search("sort:alphabetical"), search(""));
}

#[test]
fn random_order_is_reproducible_with_a_seed() {
    let query = parse_query("sort:random", &GALLERY_INDEX);
    let run = |seed: u64| {
        let results = evaluate_at(
            &GALLERY,
            &query,
            &FacetSelection::default(),
            &GALLERY_INDEX,
            now(),
            &mut StdRng::seed_from_u64(seed),
        );
        tagsieve::testing::uuids(&results)
    };
    assert_eq!(run(11), run(11));

    let mut shuffled = run(12);
    shuffled.sort();
    let mut all = search("");
    all.sort();
    assert_eq!(shuffled, all);
}
