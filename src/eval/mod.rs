// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Evaluation: filter a catalog with a parsed query and facet selection.
//!
//! ```text
//! ImageRecord[] ──► EvalCache::prepare ──► Filter::matches ──► sort ──► &ImageRecord[]
//!                   (tags expanded,         (conjunction of     (only with a
//!                    dates parsed,           every active        `sort:` key)
//!                    once per record)        constraint)
//! ```
//!
//! Results borrow from the input and keep its order unless a `sort:` key
//! reorders them. The filter pass only reads the cache, so with the `parallel`
//! feature large catalogs are filtered across threads without locking.
//!
//! **Invariant**: for a fixed `now` and without `sort:random`, evaluating the
//! same inputs twice yields the same sequence.

mod cache;
mod catalog;
mod facets;
mod filter;
mod sort;

pub use cache::{record_checksum, EvalCache, RecordFacts};
pub use catalog::Catalog;
pub use facets::{facet_counts, FacetCount, FacetCounts};
pub use filter::Filter;
pub use sort::{sort_results, SortKey};

use chrono::{DateTime, Utc};
use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::tags::TagIndex;
use crate::types::{FacetSelection, ImageRecord, ParsedQuery};

/// Below this many records, threads cost more than they save.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 2048;

/// Evaluate at the current time with a thread-local RNG.
pub fn evaluate<'r>(
    records: &'r [ImageRecord],
    query: &ParsedQuery,
    facets: &FacetSelection,
    index: &TagIndex,
) -> Vec<&'r ImageRecord> {
    evaluate_at(records, query, facets, index, Utc::now(), &mut rand::rng())
}

/// Evaluate at a fixed time with a caller-supplied RNG (for `sort:random`).
///
/// Builds a throwaway cache; sessions that evaluate repeatedly should keep an
/// [`EvalCache`] (or a [`Catalog`]) instead.
pub fn evaluate_at<'r, R>(
    records: &'r [ImageRecord],
    query: &ParsedQuery,
    facets: &FacetSelection,
    index: &TagIndex,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<&'r ImageRecord>
where
    R: Rng + ?Sized,
{
    let mut cache = EvalCache::new();
    cache.prepare(records, index);
    evaluate_cached(records, query, facets, index, &cache, now, rng)
}

/// Evaluate against a cache the caller has already prepared.
///
/// Records the cache cannot answer for (no uuid, changed since `prepare`)
/// are computed on the fly, so a stale cache costs time, never correctness.
pub fn evaluate_cached<'r, R>(
    records: &'r [ImageRecord],
    query: &ParsedQuery,
    facets: &FacetSelection,
    index: &TagIndex,
    cache: &EvalCache,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<&'r ImageRecord>
where
    R: Rng + ?Sized,
{
    let filter = Filter::new(query, facets, index, now);
    let mut results = filter_records(records, &filter, cache, index);

    #[cfg(debug_assertions)]
    crate::verify::contracts::check_results_in_input_order(records, &results);

    if let Some(key) = query.filters.sort.as_deref().and_then(SortKey::parse) {
        sort_results(&mut results, key, cache, index, rng);
    }
    results
}

fn filter_records<'r>(
    records: &'r [ImageRecord],
    filter: &Filter<'_>,
    cache: &EvalCache,
    index: &TagIndex,
) -> Vec<&'r ImageRecord> {
    let keep = |record: &ImageRecord| filter.matches(record, &cache.facts(record, index));

    #[cfg(feature = "parallel")]
    {
        if records.len() >= PARALLEL_THRESHOLD {
            return records.par_iter().filter(|record| keep(*record)).collect();
        }
    }
    records.iter().filter(|record| keep(*record)).collect()
}
