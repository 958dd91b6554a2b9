// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tag index and query engine for booru-style image galleries.
//!
//! A search box that understands `cat_ears -dog w>=1920 age<2w sort:new`:
//! aliases collapse to canonical tags, child tags imply their ancestors, and
//! `key:value` directives narrow by size, date and facet.
//!
//! # Architecture
//!
//! ```text
//! tag_index.json                         search_index.json
//!       │                                        │
//!       ▼                                        ▼
//! ┌─────────────┐   query    ┌─────────────┐   ┌──────────────────┐
//! │    tags     │──────────▶│    query    │──▶│       eval       │──▶ &ImageRecord[]
//! │ (TagIndex:  │  string    │ (tokenize,  │   │ (EvalCache,      │
//! │  aliases,   │            │  directives,│   │  Filter, sort,   │
//! │  ancestors, │◀──────────│  parse)     │   │  facet counts)   │
//! │  prefixes)  │  lookups   └─────────────┘   └──────────────────┘
//! └─────────────┘                                        ▲
//!        │                                               │
//!        ▼                                     FacetSelection (UI state)
//! ┌─────────────────────────────────────────────────────┐
//! │                      verify                         │
//! │  (validate_tag_document, debug-mode contracts)      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! | Module      | Key items                                   | Properties                   |
//! |-------------|---------------------------------------------|------------------------------|
//! | `tags`      | `TagIndex`, `suggest_tags`                  | alias closure, cycle-safe    |
//! | `query`     | `parse_query`, `tokenize`, `EngineOptions`  | total, never panics          |
//! | `eval`      | `evaluate`, `Catalog`, `facet_counts`       | stable, idempotent           |
//! | `verify`    | `validate_tag_document`, `InvariantError`   | reports what the index hides |
//! | `documents` | `read_tag_index`, `read_search_document`    | lenient decoding             |
//!
//! # Usage
//!
//! ```
//! use tagsieve::{evaluate, parse_query, FacetSelection, ImageRecord, TagIndex};
//!
//! let index = TagIndex::from_json_str(
//!     r#"{"tags": [{"tag": "animal"}, {"tag": "cat", "parents": ["animal"], "aliases": ["neko"]}]}"#,
//! );
//! let images: Vec<ImageRecord> = serde_json::from_str(
//!     r#"[{"uuid": "a", "tags": ["neko"]}, {"uuid": "b", "tags": ["sky"]}]"#,
//! )
//! .unwrap();
//!
//! let query = parse_query("animal", &index);
//! let hits = evaluate(&images, &query, &FacetSelection::default(), &index);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].uuid.as_deref(), Some("a"));
//! ```

pub mod documents;
pub mod error;
pub mod eval;
pub mod query;
pub mod tags;
mod types;
pub mod utils;
pub mod verify;

#[doc(hidden)]
pub mod testing;

#[cfg(feature = "wasm")]
mod wasm;

pub use documents::{read_search_document, read_tag_document, read_tag_index};
pub use error::{Error, Result};
pub use eval::{
    evaluate, evaluate_at, evaluate_cached, facet_counts, Catalog, EvalCache, FacetCount,
    FacetCounts, SortKey,
};
pub use query::{parse_query, parse_query_with, tokenize, EngineOptions, UnknownDirectivePolicy};
pub use tags::{
    collect_ancestors, find_missing_parents, parse_tag_input, suggest_tags, AliasEntry, TagIndex,
};
pub use types::{
    Comparison, DateRange, FacetSelection, ImageRecord, NumericRange, ParsedQuery, QueryFilters,
    SearchDocument, TagDocument, TagRecord, TagSummary,
};
pub use utils::{human_bytes, normalize_tag_name, normalize_text};
pub use verify::{find_parent_cycles, validate_tag_document, InvariantError};
