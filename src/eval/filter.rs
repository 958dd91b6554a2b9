// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The record predicate.
//!
//! A `Filter` is compiled once per evaluation from the parsed query, the facet
//! selection and the evaluation time. A record passes only if every active
//! constraint holds:
//!
//! | Constraint              | Source                         | Missing field |
//! |-------------------------|--------------------------------|---------------|
//! | collection/orientation/size | directive, else facet      | fails         |
//! | width/height/bytes      | directive ranges               | fails         |
//! | date window             | `date:`, `age:`, time facet    | fails         |
//! | tag picker, artist, character, month | facets            | fails         |
//! | include/exclude tags    | query, on the expanded set     | -             |
//! | text terms              | query, on the haystack         | -             |
//!
//! Directive values override the matching facet: `orientation:portrait` wins
//! over a "landscape" pill.

use chrono::{DateTime, Duration, Utc};

use super::cache::RecordFacts;
use crate::tags::TagIndex;
use crate::types::{DateRange, FacetSelection, ImageRecord, ParsedQuery};

#[derive(Debug)]
pub struct Filter<'q> {
    query: &'q ParsedQuery,
    collection: Option<String>,
    orientation: Option<String>,
    size: Option<String>,
    window: DateRange,
    tag: Option<String>,
    artist: Option<String>,
    character: Option<String>,
    month: Option<String>,
}

/// `now - days`, or `None` when it falls outside the representable range.
fn days_before(now: DateTime<Utc>, days: u64) -> Option<DateTime<Utc>> {
    let days = i64::try_from(days).ok()?;
    now.checked_sub_signed(Duration::try_days(days)?)
}

impl<'q> Filter<'q> {
    pub fn new(
        query: &'q ParsedQuery,
        facets: &FacetSelection,
        index: &TagIndex,
        now: DateTime<Utc>,
    ) -> Self {
        let filters = &query.filters;
        let pick = |directive: &Option<String>, facet: &Option<String>| {
            FacetSelection::active(directive).or_else(|| FacetSelection::active(facet))
        };

        let mut window = filters.date;
        if let Some(days) = filters.age_max_days {
            if let Some(cutoff) = days_before(now, u64::from(days)) {
                window.raise_min(cutoff);
            }
        }
        if let Some(days) = filters.age_min_days {
            window.lower_max(days_before(now, u64::from(days)).unwrap_or(DateTime::<Utc>::MIN_UTC));
        }
        if let Some(days) = facets.time_window_days {
            if let Some(cutoff) = days_before(now, days) {
                window.raise_min(cutoff);
            }
        }

        let resolve = |facet: &Option<String>| {
            FacetSelection::active(facet)
                .map(|value| index.resolve_raw(&value))
                .filter(|value| !value.is_empty())
        };

        Self {
            query,
            collection: pick(&filters.collection, &facets.collection),
            orientation: pick(&filters.orientation, &facets.orientation),
            size: pick(&filters.size, &facets.size),
            window,
            tag: resolve(&facets.tag),
            artist: resolve(&facets.artist),
            character: resolve(&facets.character),
            month: FacetSelection::active(&facets.month),
        }
    }

    pub fn matches(&self, record: &ImageRecord, facts: &RecordFacts) -> bool {
        self.matches_facets(facts)
            && self.matches_ranges(record)
            && self.matches_window(facts)
            && self.matches_tags(facts)
            && self.matches_text(facts)
    }

    fn matches_facets(&self, facts: &RecordFacts) -> bool {
        if let Some(collection) = &self.collection {
            if facts.collection.as_ref() != Some(collection) {
                return false;
            }
        }
        if self.orientation.as_ref().is_some_and(|o| *o != facts.orientation) {
            return false;
        }
        if self.size.as_ref().is_some_and(|s| *s != facts.size) {
            return false;
        }
        if self.tag.as_ref().is_some_and(|t| !facts.expanded.contains(t)) {
            return false;
        }
        if self.artist.as_ref().is_some_and(|a| !facts.artists.contains(a)) {
            return false;
        }
        if self.character.as_ref().is_some_and(|c| !facts.characters.contains(c)) {
            return false;
        }
        if self.month.is_some() && facts.month != self.month {
            return false;
        }
        true
    }

    fn matches_ranges(&self, record: &ImageRecord) -> bool {
        let filters = &self.query.filters;
        filters.width.admits(record.width)
            && filters.height.admits(record.height)
            && filters.bytes.admits(record.bytes)
    }

    fn matches_window(&self, facts: &RecordFacts) -> bool {
        if !self.window.is_active() {
            return true;
        }
        facts
            .created
            .as_ref()
            .is_some_and(|created| self.window.contains(created))
    }

    fn matches_tags(&self, facts: &RecordFacts) -> bool {
        let query = self.query;
        query.include_tags.iter().all(|tag| facts.expanded.contains(tag))
            && !query.exclude_tags.iter().any(|tag| facts.expanded.contains(tag))
            && query.include_artists.iter().all(|tag| facts.artists.contains(tag))
            && !query.exclude_artists.iter().any(|tag| facts.artists.contains(tag))
            && query.include_characters.iter().all(|tag| facts.characters.contains(tag))
            && !query.exclude_characters.iter().any(|tag| facts.characters.contains(tag))
    }

    fn matches_text(&self, facts: &RecordFacts) -> bool {
        let query = self.query;
        query
            .text_terms
            .iter()
            .all(|term| facts.haystack.contains(term.as_str()))
            && !query
                .text_exclude
                .iter()
                .any(|term| facts.haystack.contains(term.as_str()))
    }
}
