// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The tag index: every spelling a user might type, mapped to the one tag it means.
//!
//! Built once from the tag document, consulted on every keystroke. Three lookups
//! carry the whole query engine:
//!
//! - **Alias resolution**: `cat-ears`, `nekomimi` and `cat ears` all land on the
//!   same canonical tag.
//! - **Ancestor expansion**: a record tagged `cat_ears` also has `animal_ears`
//!   (and everything above it). Precomputed per canonical tag at build time.
//! - **Prefix resolution**: `cat_e` is a tag if exactly one canonical tag has a
//!   spelling starting with it.
//!
//! **Invariant**: every canonical tag maps to itself in the alias map, and every
//! alias maps to exactly one canonical tag. A later registration of the same
//! alias wins; `verify::validate_tag_document` reports such conflicts.
//!
//! **Verified by**:
//! - `contracts::check_index_well_formed` (debug builds, after every build)
//! - `prop_ancestors_terminate_on_cycles` (tests/property.rs)

mod ancestors;
mod prefix;
mod suggest;

pub use ancestors::{collect_ancestors, find_missing_parents};
pub use prefix::PREFIX_MIN_LEN;
pub use suggest::{parse_tag_input, suggest_tags, SUGGESTION_LIMIT};

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{TagDocument, TagRecord};
use crate::utils::{normalize_tag_name, push_unique, safe_tag_slug};
use prefix::PrefixCache;

/// Tag type assumed when the document does not name one.
pub const DEFAULT_TAG_TYPE: &str = "general";

/// An alias spelling and the canonical tag it redirects to (self-mappings excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub alias: String,
    pub canonical: String,
}

/// Immutable lookup structure over the tag vocabulary.
#[derive(Debug, Default)]
pub struct TagIndex {
    /// Every known spelling → canonical tag.
    alias_map: HashMap<String, String>,
    /// Keys of `alias_map` in first-registration order (stable scans).
    alias_order: Vec<String>,
    /// Canonical tag → direct parents (canonical, deduplicated, no self-links).
    parent_map: HashMap<String, Vec<String>>,
    /// Canonical tag → transitive ancestors, parents before their own ancestors.
    ancestors: HashMap<String, Vec<String>>,
    /// Sorted canonical tags (aliases excluded).
    canonical_tags: Vec<String>,
    alias_entries: Vec<AliasEntry>,
    types: HashMap<String, String>,
    slugs: HashMap<String, String>,
    fingerprint: u32,
    prefix_cache: PrefixCache,
}

impl TagIndex {
    /// An index with no entries. Every bareword becomes free text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index from raw vocabulary entries.
    ///
    /// Entries whose normalized name is empty are skipped. Entries with a
    /// non-empty `alias_of` only register spellings; everything else
    /// (parents, type, slug) comes from canonical entries.
    pub fn build(records: &[TagRecord]) -> Self {
        let mut builder = Builder::default();
        for record in records {
            builder.add(record);
        }
        let index = builder.finish();

        #[cfg(debug_assertions)]
        crate::verify::contracts::check_index_well_formed(&index);

        debug!(
            canonical = index.canonical_tags.len(),
            spellings = index.alias_map.len(),
            fingerprint = index.fingerprint,
            "built tag index"
        );
        index
    }

    pub fn from_document(document: &TagDocument) -> Self {
        Self::build(&document.tags)
    }

    /// Build from an already-decoded JSON value.
    ///
    /// Anything other than `{ "tags": [...] }` yields an empty index. Array
    /// elements that are not tag objects are skipped individually.
    pub fn from_value(value: &Value) -> Self {
        if !value.get("tags").is_some_and(Value::is_array) {
            warn!("tag document has no `tags` array; using an empty tag index");
            return Self::empty();
        }
        Self::from_document(&TagDocument::from_value(value))
    }

    /// Build from JSON text, degrading to an empty index on malformed input.
    pub fn from_json_str(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                warn!(%err, "tag document is not valid JSON; using an empty tag index");
                Self::empty()
            }
        }
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    /// Canonical tag for an already-normalized spelling, if known.
    pub fn canonical_of(&self, normalized: &str) -> Option<&str> {
        self.alias_map.get(normalized).map(String::as_str)
    }

    /// Canonical tag for an already-normalized spelling, falling back to itself.
    pub fn resolve(&self, normalized: &str) -> String {
        self.canonical_of(normalized)
            .unwrap_or(normalized)
            .to_string()
    }

    /// Normalize raw input, then resolve it. Empty input stays empty.
    pub fn resolve_raw(&self, raw: &str) -> String {
        let normalized = normalize_tag_name(raw);
        if normalized.is_empty() {
            return normalized;
        }
        self.resolve(&normalized)
    }

    pub fn is_known(&self, normalized: &str) -> bool {
        self.alias_map.contains_key(normalized)
    }

    /// Direct parents of a canonical tag.
    pub fn parents(&self, canonical: &str) -> &[String] {
        self.parent_map.get(canonical).map_or(&[], Vec::as_slice)
    }

    /// Transitive ancestors of a canonical tag (the tag itself excluded).
    pub fn ancestors(&self, canonical: &str) -> &[String] {
        self.ancestors.get(canonical).map_or(&[], Vec::as_slice)
    }

    /// Canonical tags a record's raw tags imply: each raw tag resolved, plus
    /// every ancestor of each.
    pub fn expand<'a, I>(&self, raw_tags: I) -> HashSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut expanded = HashSet::new();
        for raw in raw_tags {
            let canonical = self.resolve_raw(raw);
            if canonical.is_empty() {
                continue;
            }
            for ancestor in self.ancestors(&canonical) {
                expanded.insert(ancestor.clone());
            }
            expanded.insert(canonical);
        }
        expanded
    }

    /// Unique canonical tag with a spelling starting with `prefix`.
    ///
    /// `None` when the prefix is shorter than [`PREFIX_MIN_LEN`] characters,
    /// matches nothing, or matches more than one canonical tag.
    pub fn resolve_prefix(&self, prefix: &str) -> Option<String> {
        self.resolve_prefix_min(prefix, PREFIX_MIN_LEN)
    }

    /// [`resolve_prefix`](Self::resolve_prefix) with a custom minimum length.
    pub fn resolve_prefix_min(&self, prefix: &str, min_len: usize) -> Option<String> {
        if prefix.is_empty() || prefix.chars().count() < min_len.max(1) {
            return None;
        }
        self.prefix_cache.get_or_compute(prefix, || {
            prefix::unique_prefix_match(
                self.alias_order
                    .iter()
                    .filter_map(|alias| Some((alias.as_str(), self.alias_map.get(alias)?.as_str()))),
                prefix,
            )
        })
    }

    /// Tag type (`general`, `artist`, `character`, ...), lowercased.
    pub fn tag_type(&self, canonical: &str) -> &str {
        self.types
            .get(canonical)
            .map_or(DEFAULT_TAG_TYPE, String::as_str)
    }

    /// URL slug: the document's own slug when it carried one, else a safe fallback.
    pub fn slug(&self, tag: &str) -> String {
        let canonical = self.resolve_raw(tag);
        self.slugs
            .get(&canonical)
            .cloned()
            .unwrap_or_else(|| safe_tag_slug(&canonical))
    }

    pub fn canonical_tags(&self) -> &[String] {
        &self.canonical_tags
    }

    pub fn alias_entries(&self) -> &[AliasEntry] {
        &self.alias_entries
    }

    /// All spellings with their canonical tag, in first-registration order.
    pub fn spellings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.alias_order
            .iter()
            .filter_map(|alias| Some((alias.as_str(), self.alias_map.get(alias)?.as_str())))
    }

    /// CRC32 over the index content. Equal content, equal fingerprint.
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    pub fn is_empty(&self) -> bool {
        self.alias_map.is_empty()
    }

    /// Number of memoized prefix lookups.
    pub fn cached_prefixes(&self) -> usize {
        self.prefix_cache.len()
    }
}

impl Clone for TagIndex {
    fn clone(&self) -> Self {
        Self {
            alias_map: self.alias_map.clone(),
            alias_order: self.alias_order.clone(),
            parent_map: self.parent_map.clone(),
            ancestors: self.ancestors.clone(),
            canonical_tags: self.canonical_tags.clone(),
            alias_entries: self.alias_entries.clone(),
            types: self.types.clone(),
            slugs: self.slugs.clone(),
            fingerprint: self.fingerprint,
            prefix_cache: PrefixCache::default(),
        }
    }
}

// =============================================================================
// BUILDER
// =============================================================================

#[derive(Default)]
struct Builder {
    alias_map: HashMap<String, String>,
    alias_order: Vec<String>,
    raw_parents: Vec<(String, Vec<String>)>,
    canonical: Vec<String>,
    types: HashMap<String, String>,
    slugs: HashMap<String, String>,
}

impl Builder {
    fn register(&mut self, spelling: String, canonical: &str) {
        match self.alias_map.get_mut(&spelling) {
            Some(existing) => {
                if existing != canonical {
                    debug!(alias = %spelling, from = %existing, to = %canonical, "alias re-registered");
                    *existing = canonical.to_string();
                }
            }
            None => {
                self.alias_map.insert(spelling.clone(), canonical.to_string());
                self.alias_order.push(spelling);
            }
        }
    }

    fn add(&mut self, record: &TagRecord) {
        let name = normalize_tag_name(record.tag.as_deref().unwrap_or_default());
        if name.is_empty() {
            return;
        }
        let alias_of = record
            .alias_of
            .as_deref()
            .map(normalize_tag_name)
            .filter(|target| !target.is_empty());
        let is_alias = alias_of.is_some();
        let canonical = alias_of.unwrap_or_else(|| name.clone());

        self.register(name.clone(), &canonical);
        for alias in &record.aliases {
            let alias = normalize_tag_name(alias);
            if !alias.is_empty() {
                self.register(alias, &canonical);
            }
        }

        let tag_type = record
            .tag_type
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        if is_alias {
            // An alias may still tell us the type of the tag it points to
            if let Some(tag_type) = tag_type {
                self.types.entry(canonical).or_insert(tag_type);
            }
            return;
        }

        if let Some(tag_type) = tag_type {
            self.types.insert(canonical.clone(), tag_type);
        }
        if let Some(slug) = record.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            self.slugs.insert(canonical.clone(), slug.to_string());
        }
        let parents = record
            .parents
            .iter()
            .map(|p| normalize_tag_name(p))
            .filter(|p| !p.is_empty())
            .collect();
        self.raw_parents.push((canonical.clone(), parents));
        self.canonical.push(canonical);
    }

    fn finish(mut self) -> TagIndex {
        // Parent names are resolved only after every spelling is registered, so
        // a parent may be declared before or after the tag that names it.
        let mut parent_map: HashMap<String, Vec<String>> = HashMap::new();
        let raw_parents = std::mem::take(&mut self.raw_parents);
        for (canonical, parents) in raw_parents {
            let resolved = parent_map.entry(canonical.clone()).or_default();
            for parent in parents {
                let parent = self.alias_map.get(&parent).cloned().unwrap_or(parent);
                if parent != canonical {
                    push_unique(resolved, parent);
                }
            }
        }

        // Parents and alias targets nobody declared still have to be reachable by name
        let mut undeclared: Vec<String> = parent_map
            .values()
            .flatten()
            .chain(self.alias_map.values())
            .filter(|name| !self.alias_map.contains_key(*name))
            .cloned()
            .collect();
        undeclared.sort();
        undeclared.dedup();
        for name in undeclared {
            self.register(name.clone(), &name);
        }
        parent_map.retain(|_, parents| !parents.is_empty());

        let ancestors: HashMap<String, Vec<String>> = parent_map
            .keys()
            .map(|tag| (tag.clone(), collect_ancestors(tag, &parent_map)))
            .collect();

        let mut canonical_tags = self.canonical;
        canonical_tags.sort();
        canonical_tags.dedup();

        let alias_entries = self
            .alias_order
            .iter()
            .filter_map(|alias| {
                let canonical = self.alias_map.get(alias)?;
                (alias != canonical).then(|| AliasEntry {
                    alias: alias.clone(),
                    canonical: canonical.clone(),
                })
            })
            .collect();

        let mut index = TagIndex {
            alias_map: self.alias_map,
            alias_order: self.alias_order,
            parent_map,
            ancestors,
            canonical_tags,
            alias_entries,
            types: self.types,
            slugs: self.slugs,
            fingerprint: 0,
            prefix_cache: PrefixCache::default(),
        };
        index.fingerprint = fingerprint(&index);
        index
    }
}

/// CRC32 over spellings, parents and types, visited in sorted order.
fn fingerprint(index: &TagIndex) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    let mut spellings: Vec<(&String, &String)> = index.alias_map.iter().collect();
    spellings.sort();
    for (alias, canonical) in spellings {
        hasher.update(alias.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(canonical.as_bytes());
        hasher.update(&[0x1e]);
    }
    let mut parents: Vec<(&String, &Vec<String>)> = index.parent_map.iter().collect();
    parents.sort();
    for (tag, list) in parents {
        hasher.update(tag.as_bytes());
        for parent in list {
            hasher.update(&[0x1f]);
            hasher.update(parent.as_bytes());
        }
        hasher.update(&[0x1e]);
    }
    let mut types: Vec<(&String, &String)> = index.types.iter().collect();
    types.sort();
    for (tag, tag_type) in types {
        hasher.update(tag.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(tag_type.as_bytes());
        hasher.update(&[0x1e]);
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{alias, child, tag};

    #[test]
    fn canonical_maps_to_itself() {
        let index = TagIndex::build(&[tag("Cat Ears"), alias("nekomimi", "cat ears")]);
        assert_eq!(index.canonical_of("cat ears"), Some("cat ears"));
        assert_eq!(index.canonical_of("nekomimi"), Some("cat ears"));
        assert_eq!(index.canonical_tags(), ["cat ears"]);
    }

    #[test]
    fn skips_entries_with_empty_names() {
        let index = TagIndex::build(&[tag("  # "), tag("sky")]);
        assert_eq!(index.canonical_tags(), ["sky"]);
    }

    #[test]
    fn inline_aliases_register_against_canonical() {
        let mut record = tag("cat_ears");
        record.aliases = vec!["Nekomimi".into(), "#kemonomimi".into()];
        let index = TagIndex::build(&[record]);
        assert_eq!(index.resolve("nekomimi"), "cat_ears");
        assert_eq!(index.resolve("kemonomimi"), "cat_ears");
        assert_eq!(index.alias_entries().len(), 2);
    }

    #[test]
    fn last_alias_registration_wins() {
        let index = TagIndex::build(&[
            tag("alpha"),
            tag("beta"),
            alias("shared", "alpha"),
            alias("shared", "beta"),
        ]);
        assert_eq!(index.resolve("shared"), "beta");
    }

    #[test]
    fn parents_resolve_through_aliases() {
        let index = TagIndex::build(&[
            child("cat_ears", &["kemono ears"]),
            alias("kemono ears", "animal_ears"),
            tag("animal_ears"),
        ]);
        assert_eq!(index.parents("cat_ears"), ["animal_ears"]);
        assert_eq!(index.ancestors("cat_ears"), ["animal_ears"]);
    }

    #[test]
    fn undeclared_parents_are_known() {
        let index = TagIndex::build(&[child("kitten", &["cat"])]);
        assert!(index.is_known("cat"));
        assert_eq!(index.canonical_tags(), ["kitten"]);
    }

    #[test]
    fn expand_includes_every_ancestor() {
        let index = TagIndex::build(&[
            child("kitten", &["cat"]),
            child("cat", &["animal"]),
            tag("animal"),
        ]);
        let expanded = index.expand(["Kitten"]);
        for expected in ["kitten", "cat", "animal"] {
            assert!(expanded.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn self_parent_is_dropped() {
        let index = TagIndex::build(&[child("loop", &["loop"])]);
        assert!(index.parents("loop").is_empty());
    }

    #[test]
    fn malformed_documents_degrade_to_empty() {
        assert!(TagIndex::from_json_str("not json").is_empty());
        assert!(TagIndex::from_json_str("[1, 2]").is_empty());
        assert!(TagIndex::from_json_str(r#"{"tags": "cat"}"#).is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_individually() {
        let index = TagIndex::from_json_str(r#"{"tags": [42, {"tag": "sky"}, {"tag": null}]}"#);
        assert_eq!(index.canonical_tags(), ["sky"]);
    }

    #[test]
    fn tag_types_default_to_general() {
        let mut artist = tag("hokusai");
        artist.tag_type = Some("Artist".into());
        let index = TagIndex::build(&[artist, tag("wave")]);
        assert_eq!(index.tag_type("hokusai"), "artist");
        assert_eq!(index.tag_type("wave"), DEFAULT_TAG_TYPE);
    }

    #[test]
    fn slug_prefers_document_value() {
        let mut record = tag("a/b");
        record.slug = Some("a-b-slug".into());
        let index = TagIndex::build(&[record, tag("c\\d")]);
        assert_eq!(index.slug("A/B"), "a-b-slug");
        assert_eq!(index.slug("c\\d"), "c-d");
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = TagIndex::build(&[tag("sky"), alias("heavens", "sky")]);
        let b = TagIndex::build(&[alias("heavens", "sky"), tag("sky")]);
        let c = TagIndex::build(&[tag("sky")]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
