// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A search session: one tag index, one image list, one warm cache.
//!
//! The page builds a `Catalog` once, then calls `search` on every keystroke.
//! Replacing either input goes through the catalog so the cache is rebuilt
//! against the new data.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};

use super::cache::EvalCache;
use super::facets::{facet_counts, FacetCounts};
use crate::query::{parse_query_with, EngineOptions};
use crate::tags::{suggest_tags, TagIndex};
use crate::types::{FacetSelection, ImageRecord, ParsedQuery};
use crate::utils::normalize_tag_name;

#[derive(Debug)]
pub struct Catalog {
    index: TagIndex,
    images: Vec<ImageRecord>,
    cache: EvalCache,
    options: EngineOptions,
}

impl Catalog {
    pub fn new(index: TagIndex, images: Vec<ImageRecord>) -> Self {
        Self::with_options(index, images, EngineOptions::default())
    }

    pub fn with_options(index: TagIndex, images: Vec<ImageRecord>, options: EngineOptions) -> Self {
        let mut cache = EvalCache::new();
        cache.prepare(&images, &index);
        info!(
            images = images.len(),
            tags = index.canonical_tags().len(),
            "catalog ready"
        );
        Self {
            index,
            images,
            cache,
            options,
        }
    }

    pub fn parse(&self, query: &str) -> ParsedQuery {
        parse_query_with(query, &self.index, &self.options)
    }

    /// Parse and evaluate at the current time.
    pub fn search(&mut self, query: &str, facets: &FacetSelection) -> Vec<&ImageRecord> {
        self.search_at(query, facets, Utc::now(), &mut rand::rng())
    }

    pub fn search_at<R>(
        &mut self,
        query: &str,
        facets: &FacetSelection,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<&ImageRecord>
    where
        R: Rng + ?Sized,
    {
        let parsed = self.parse(query);
        self.evaluate_at(&parsed, facets, now, rng)
    }

    /// Evaluate an already-parsed query.
    pub fn evaluate_at<R>(
        &mut self,
        query: &ParsedQuery,
        facets: &FacetSelection,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<&ImageRecord>
    where
        R: Rng + ?Sized,
    {
        // Cheap when nothing changed: one checksum per record
        self.cache.prepare(&self.images, &self.index);
        super::evaluate_cached(
            &self.images,
            query,
            facets,
            &self.index,
            &self.cache,
            now,
            rng,
        )
    }

    pub fn suggest(&self, prefix: &str, existing: &[String]) -> Vec<String> {
        suggest_tags(prefix, &self.index, existing, self.options.suggestion_limit)
    }

    /// The one canonical tag `prefix` abbreviates, honoring the configured minimum length.
    pub fn resolve_prefix(&self, prefix: &str) -> Option<String> {
        self.index
            .resolve_prefix_min(&normalize_tag_name(prefix), self.options.prefix_min_len)
    }

    pub fn facet_counts(&mut self) -> FacetCounts {
        self.cache.prepare(&self.images, &self.index);
        facet_counts(
            &self.images,
            &self.index,
            &self.cache,
            self.options.artist_facet_limit,
        )
    }

    pub fn replace_images(&mut self, images: Vec<ImageRecord>) {
        debug!(old = self.images.len(), new = images.len(), "replacing images");
        self.images = images;
        self.cache.prepare(&self.images, &self.index);
    }

    pub fn replace_tag_index(&mut self, index: TagIndex) {
        debug!(
            old = self.index.fingerprint(),
            new = index.fingerprint(),
            "replacing tag index"
        );
        self.index = index;
        self.cache.clear();
        self.cache.prepare(&self.images, &self.index);
    }

    pub fn set_options(&mut self, options: EngineOptions) {
        self.options = options;
    }

    pub fn index(&self) -> &TagIndex {
        &self.index
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn cache(&self) -> &EvalCache {
        &self.cache
    }
}
