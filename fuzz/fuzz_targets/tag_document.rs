// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for tag document loading.
//!
//! Tag documents are hand-edited JSON. Whatever arrives, building the index
//! must not panic, ancestor walks must terminate (cycles included), and the
//! validator must agree to look at it.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tagsieve::{find_parent_cycles, validate_tag_document, TagDocument, TagIndex};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };

    let index = TagIndex::from_json_str(json);
    for tag in index.canonical_tags() {
        let ancestors = index.ancestors(tag);
        assert!(!ancestors.contains(tag), "{tag} is its own ancestor");
        assert!(ancestors.len() <= index.canonical_tags().len());
        let _ = index.resolve_prefix(tag);
    }
    let _ = find_parent_cycles(&index);

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(json) {
        let document = TagDocument::from_value(&value);
        let _ = validate_tag_document(&document.tags);
    }
});
