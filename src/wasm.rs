// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Browser bindings.
//!
//! ```js
//! import init, { TagSieve } from './tagsieve.js';
//!
//! await init();
//! const sieve = new TagSieve(await (await fetch('/tag_index.json')).json());
//! sieve.setImages(await (await fetch('/search_index.json')).json());
//! const hits = sieve.search('cat -dog sort:new', { orientation: 'landscape' });
//! ```
//!
//! Documents cross the boundary as plain JS objects and are decoded through
//! `serde_json::Value`, so the same lenient rules apply as on the native side.
//! Results are plain objects too (no `Map`s), ready for templating.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

use crate::eval::Catalog;
use crate::query::EngineOptions;
use crate::tags::TagIndex;
use crate::types::{FacetSelection, SearchDocument};

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_else(Utc::now)
}

#[wasm_bindgen]
pub struct TagSieve {
    catalog: Catalog,
}

#[wasm_bindgen]
impl TagSieve {
    /// Build from a parsed `tag_index.json`. A malformed document yields an
    /// empty index rather than an error.
    #[wasm_bindgen(constructor)]
    pub fn new(tag_document: JsValue) -> Result<TagSieve, JsValue> {
        let value: Value = from_value(tag_document).map_err(|e| e.to_string())?;
        Ok(TagSieve {
            catalog: Catalog::new(TagIndex::from_value(&value), Vec::new()),
        })
    }

    /// Replace the searchable images with a parsed `search_index.json`.
    #[wasm_bindgen(js_name = setImages)]
    pub fn set_images(&mut self, search_document: JsValue) -> Result<(), JsValue> {
        let value: Value = from_value(search_document).map_err(|e| e.to_string())?;
        let document = SearchDocument::from_value(&value).map_err(|e| e.to_string())?;
        self.catalog.replace_images(document.images);
        Ok(())
    }

    /// Engine options as a plain object; unknown keys are rejected.
    #[wasm_bindgen(js_name = setOptions)]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let value: Value = from_value(options).map_err(|e| e.to_string())?;
        let options = EngineOptions::from_json_str(&value.to_string()).map_err(|e| e.to_string())?;
        self.catalog.set_options(options);
        Ok(())
    }

    /// Matching image records, in document order unless the query sorts.
    #[wasm_bindgen]
    pub fn search(&mut self, query: &str, facets: Option<JsValue>) -> Result<JsValue, JsValue> {
        let facets: FacetSelection = match facets {
            Some(facets) if !facets.is_undefined() && !facets.is_null() => {
                from_value(facets).map_err(|e| e.to_string())?
            }
            _ => FacetSelection::default(),
        };
        let results = self
            .catalog
            .search_at(query, &facets, now(), &mut rand::rng());
        to_js(&results)
    }

    #[wasm_bindgen]
    pub fn parse(&self, query: &str) -> Result<JsValue, JsValue> {
        to_js(&self.catalog.parse(query))
    }

    /// Completions for a partially typed tag.
    #[wasm_bindgen]
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        self.catalog.suggest(prefix, &[])
    }

    /// The canonical tag `prefix` unambiguously abbreviates, if any.
    #[wasm_bindgen(js_name = resolvePrefix)]
    pub fn resolve_prefix(&self, prefix: &str) -> Option<String> {
        self.catalog.resolve_prefix(prefix)
    }

    /// Artist, character and month counts over the loaded images.
    #[wasm_bindgen(js_name = facetCounts)]
    pub fn facet_counts(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.catalog.facet_counts())
    }

    /// Number of loaded images.
    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.catalog.images().len()
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.catalog.images().is_empty()
    }
}
