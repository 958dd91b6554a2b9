// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-record memo: everything about a record the filter needs, computed once.
//!
//! The same few thousand records are re-evaluated on every keystroke. Tag
//! expansion and date parsing dominate that cost and depend only on the record
//! and the tag index, so they are cached by uuid.
//!
//! Staleness is checked, not assumed:
//! - each entry stores a CRC32 of the record fields it was computed from, and
//! - the cache stores the tag index fingerprint it was filled against.
//!
//! A changed record recomputes its own entry; a changed index drops everything.
//! Records without a uuid are never cached and are computed on demand.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::tags::TagIndex;
use crate::types::ImageRecord;
use crate::utils::{format_month, normalize_tag_name, normalize_text, parse_datetime};

/// Derived view of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFacts {
    /// Resolved raw tags plus all their ancestors.
    pub expanded: HashSet<String>,
    /// Resolved raw tags typed `artist` (ancestors not included).
    pub artists: Vec<String>,
    /// Resolved raw tags typed `character`.
    pub characters: Vec<String>,
    pub created: Option<DateTime<Utc>>,
    /// `YYYY-MM` of `favorited_at`, falling back to `created_at`.
    pub month: Option<String>,
    pub collection: Option<String>,
    pub orientation: String,
    pub size: String,
    /// Normalized `title description raw-tags`, searched by free-text terms.
    pub haystack: String,
}

impl RecordFacts {
    pub fn compute(record: &ImageRecord, index: &TagIndex) -> Self {
        let expanded = index.expand(record.tags.iter().map(String::as_str));

        let mut artists = Vec::new();
        let mut characters = Vec::new();
        for raw in &record.tags {
            let normalized = normalize_tag_name(raw);
            if normalized.is_empty() {
                continue;
            }
            let canonical = index.resolve(&normalized);
            let list = match index.tag_type(&canonical) {
                "artist" => &mut artists,
                "character" => &mut characters,
                _ => continue,
            };
            if !list.contains(&canonical) {
                list.push(canonical);
            }
        }

        let created = record.created_at.as_deref().and_then(parse_datetime);
        let month = record
            .favorited_at
            .as_deref()
            .and_then(parse_datetime)
            .or(created)
            .map(|dt| format_month(&dt));

        let haystack = normalize_text(&format!(
            "{} {} {}",
            record.title.as_deref().unwrap_or_default(),
            record.description.as_deref().unwrap_or_default(),
            record.tags.join(" ")
        ));

        Self {
            expanded,
            artists,
            characters,
            created,
            month,
            collection: record
                .collection
                .as_deref()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty()),
            orientation: record.orientation(),
            size: record.size_bucket(),
            haystack,
        }
    }

    /// Creation time in epoch milliseconds; unparsable dates sort as 0.
    pub fn created_millis(&self) -> i64 {
        self.created.map_or(0, |dt| dt.timestamp_millis())
    }
}

/// CRC32 over every field `RecordFacts` reads.
pub fn record_checksum(record: &ImageRecord) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    let mut field = |value: Option<&str>| {
        hasher.update(value.unwrap_or_default().as_bytes());
        hasher.update(&[0x1f]);
    };
    field(record.title.as_deref());
    field(record.description.as_deref());
    field(record.collection.as_deref());
    field(record.orientation.as_deref());
    field(record.size_bucket.as_deref());
    field(record.created_at.as_deref());
    field(record.favorited_at.as_deref());
    for tag in &record.tags {
        field(Some(tag.as_str()));
    }
    for dimension in [record.width, record.height] {
        hasher.update(&dimension.unwrap_or(0).to_le_bytes());
    }
    hasher.finalize()
}

#[derive(Debug, Clone)]
struct CachedFacts {
    checksum: u32,
    facts: RecordFacts,
}

#[derive(Debug, Default)]
pub struct EvalCache {
    fingerprint: Option<u32>,
    entries: HashMap<String, CachedFacts>,
}

impl EvalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the cache up to date with `records` under `index`. Entries for
    /// uuids absent from `records` are dropped.
    pub fn prepare(&mut self, records: &[ImageRecord], index: &TagIndex) {
        if self.fingerprint != Some(index.fingerprint()) {
            if !self.entries.is_empty() {
                debug!(entries = self.entries.len(), "tag index changed; dropping record facts");
            }
            self.entries.clear();
            self.fingerprint = Some(index.fingerprint());
        }

        let mut computed = 0usize;
        let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
        for record in records {
            let Some(key) = record.key() else {
                continue;
            };
            seen.insert(key);
            let checksum = record_checksum(record);
            if self
                .entries
                .get(key)
                .is_some_and(|cached| cached.checksum == checksum)
            {
                continue;
            }
            self.entries.insert(
                key.to_string(),
                CachedFacts {
                    checksum,
                    facts: RecordFacts::compute(record, index),
                },
            );
            computed += 1;
        }

        let before = self.entries.len();
        self.entries.retain(|key, _| seen.contains(key.as_str()));
        let pruned = before - self.entries.len();
        if computed > 0 || pruned > 0 {
            debug!(computed, pruned, cached = self.entries.len(), "record facts refreshed");
        }
    }

    /// Cached facts, only if they are still valid for this record and index.
    pub fn get(&self, record: &ImageRecord, index: &TagIndex) -> Option<&RecordFacts> {
        if self.fingerprint != Some(index.fingerprint()) {
            return None;
        }
        let cached = self.entries.get(record.key()?)?;
        (cached.checksum == record_checksum(record)).then_some(&cached.facts)
    }

    /// Cached facts, or freshly computed ones when the cache cannot answer.
    pub fn facts<'a>(&'a self, record: &ImageRecord, index: &TagIndex) -> Cow<'a, RecordFacts> {
        match self.get(record, index) {
            Some(facts) => Cow::Borrowed(facts),
            None => Cow::Owned(RecordFacts::compute(record, index)),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.fingerprint = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{image, sample_tag_index, tag};

    #[test]
    fn facts_expand_tags_and_types() {
        let index = sample_tag_index();
        let facts = RecordFacts::compute(&image("a", &["Kitten", "hokusai", "miku"]), &index);
        for expected in ["kitten", "cat", "animal", "hokusai", "miku"] {
            assert!(facts.expanded.contains(expected), "missing {expected}");
        }
        assert_eq!(facts.artists, ["hokusai"]);
        assert_eq!(facts.characters, ["miku"]);
    }

    #[test]
    fn month_prefers_favorited_at() {
        let mut record = image("a", &[]);
        record.created_at = Some("2023-01-05".into());
        let index = TagIndex::empty();
        assert_eq!(RecordFacts::compute(&record, &index).month.as_deref(), Some("2023-01"));
        record.favorited_at = Some("2024-07-10T10:00:00Z".into());
        assert_eq!(RecordFacts::compute(&record, &index).month.as_deref(), Some("2024-07"));
    }

    #[test]
    fn haystack_covers_title_description_and_tags() {
        let mut record = image("a", &["Blue_Hour"]);
        record.title = Some("Harbor".into());
        record.description = Some("Fog at DAWN".into());
        let facts = RecordFacts::compute(&record, &TagIndex::empty());
        assert!(facts.haystack.contains("harbor"));
        assert!(facts.haystack.contains("fog at dawn"));
        assert!(facts.haystack.contains("blue_hour"));
    }

    #[test]
    fn prepare_caches_by_uuid() {
        let index = sample_tag_index();
        let records = vec![image("a", &["cat"]), image("b", &["sky"]), image("", &["sky"])];
        let mut cache = EvalCache::new();
        cache.prepare(&records, &index);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&records[0], &index).is_some());
        assert!(cache.get(&records[2], &index).is_none());
        assert!(matches!(cache.facts(&records[2], &index), Cow::Owned(_)));
    }

    #[test]
    fn changed_record_is_not_served_stale() {
        let index = sample_tag_index();
        let mut records = vec![image("a", &["cat"])];
        let mut cache = EvalCache::new();
        cache.prepare(&records, &index);

        records[0].tags = vec!["sky".into()];
        assert!(cache.get(&records[0], &index).is_none());
        assert!(cache.facts(&records[0], &index).expanded.contains("sky"));

        cache.prepare(&records, &index);
        assert!(cache.get(&records[0], &index).unwrap().expanded.contains("sky"));
    }

    #[test]
    fn new_index_invalidates_everything() {
        let records = vec![image("a", &["kitten"])];
        let mut cache = EvalCache::new();
        cache.prepare(&records, &sample_tag_index());

        let flat = TagIndex::build(&[tag("kitten")]);
        assert!(cache.get(&records[0], &flat).is_none());
        cache.prepare(&records, &flat);
        let facts = cache.get(&records[0], &flat).unwrap();
        assert!(!facts.expanded.contains("cat"));
    }

    #[test]
    fn prepare_drops_records_that_left_the_list() {
        let index = sample_tag_index();
        let mut cache = EvalCache::new();
        for round in 0..5 {
            let records: Vec<_> = (0..3)
                .map(|i| image(&format!("r{}-{}", round, i), &["sky"]))
                .collect();
            cache.prepare(&records, &index);
            assert_eq!(cache.len(), 3);
        }

        let kept = vec![image("keep", &["cat"]), image("gone", &["sky"])];
        cache.prepare(&kept, &index);
        cache.prepare(&kept[..1], &index);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&kept[0], &index).is_some());
        assert!(cache.get(&kept[1], &index).is_none());
    }
}
