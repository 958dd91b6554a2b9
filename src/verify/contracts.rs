// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the index, the parser and the evaluator.
//!
//! These contracts:
//!
//! 1. Are **zero-cost in release builds** (use `debug_assert!`)
//! 2. Provide **early failure detection** during development
//! 3. Only check what construction guarantees for *any* input. Properties a
//!    bad document can break (alias conflicts, cycles) belong to
//!    `validate_tag_document`, not here.
//!
//! | Contract Function             | Guarantee                                          |
//! |-------------------------------|----------------------------------------------------|
//! | `check_index_well_formed`     | sorted canonical list, no self-ancestors, parents known |
//! | `check_query_deduplicated`    | every `ParsedQuery` list is duplicate-free         |
//! | `check_results_in_input_order`| unsorted results are a subsequence of the input    |

use std::collections::HashSet;

use crate::tags::TagIndex;
use crate::types::{ImageRecord, ParsedQuery};

// ============================================================================
// TAG INDEX CONTRACTS
// ============================================================================

/// Check the structural guarantees of a freshly built index.
///
/// # Panics (debug builds only)
/// Panics if the canonical list is unsorted or has duplicates, a tag is its
/// own ancestor, a parent is not a known spelling, or an alias entry is a
/// self-mapping.
#[inline]
pub fn check_index_well_formed(index: &TagIndex) {
    debug_assert!(
        index.canonical_tags().windows(2).all(|w| w[0] < w[1]),
        "canonical tags must be sorted and unique"
    );
    for tag in index.canonical_tags() {
        debug_assert!(
            !index.ancestors(tag).contains(tag),
            "tag '{}' is its own ancestor",
            tag
        );
        for parent in index.parents(tag) {
            debug_assert!(
                index.is_known(parent),
                "parent '{}' of '{}' is not a known spelling",
                parent,
                tag
            );
        }
    }
    debug_assert!(
        index.alias_entries().iter().all(|e| e.alias != e.canonical),
        "alias entries must exclude self-mappings"
    );
}

// ============================================================================
// QUERY CONTRACTS
// ============================================================================

fn is_unique(list: &[String]) -> bool {
    let mut seen = HashSet::new();
    list.iter().all(|item| seen.insert(item))
}

/// # Panics (debug builds only)
/// Panics if any include/exclude list holds the same value twice.
#[inline]
pub fn check_query_deduplicated(query: &ParsedQuery) {
    for (name, list) in [
        ("include_tags", &query.include_tags),
        ("exclude_tags", &query.exclude_tags),
        ("include_artists", &query.include_artists),
        ("exclude_artists", &query.exclude_artists),
        ("include_characters", &query.include_characters),
        ("exclude_characters", &query.exclude_characters),
        ("text_terms", &query.text_terms),
        ("text_exclude", &query.text_exclude),
    ] {
        debug_assert!(is_unique(list), "{} has duplicates: {:?}", name, list);
    }
}

// ============================================================================
// EVALUATION CONTRACTS
// ============================================================================

/// # Panics (debug builds only)
/// Panics if `results` is not a subsequence of `records` (by address).
#[inline]
pub fn check_results_in_input_order(records: &[ImageRecord], results: &[&ImageRecord]) {
    let mut remaining = records.iter();
    let ordered = results
        .iter()
        .all(|result| remaining.any(|record| std::ptr::eq(record, *result)));
    debug_assert!(ordered, "unsorted results must preserve input order");
}
