// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a gallery query.
//!
//! These types describe what comes in (tag documents, image records), what the
//! parser produces (`ParsedQuery`), and what the UI hands the evaluator
//! (`FacetSelection`).
//!
//! | Type             | Source                   | Lifetime                      |
//! |------------------|--------------------------|-------------------------------|
//! | `TagRecord`      | `tag_index.json`         | consumed by `TagIndex::build` |
//! | `ImageRecord`    | `search_index.json`      | owned by the caller           |
//! | `ParsedQuery`    | `parse_query`            | one per keystroke             |
//! | `FacetSelection` | UI pills, tabs, pickers  | one per evaluation            |
//!
//! # Invariants
//!
//! - **ParsedQuery**: every tag in `include_tags` / `exclude_tags` is canonical
//!   (already resolved through the alias map), and every list is duplicate-free.
//! - **NumericRange**: bounds only ever tighten; `min` never decreases and `max`
//!   never increases once set.
//!
//! Record fields are decoded leniently: a width that arrives as `"1920"` is still
//! a width, and a width that arrives as `"wide"` is simply missing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::{
    classify_orientation, lenient_string, lenient_string_list, lenient_u64, size_bucket,
};

// =============================================================================
// SOURCE DOCUMENTS
// =============================================================================

/// One vocabulary entry from the tag index document.
///
/// A non-empty `alias_of` turns the entry into a redirect: it resolves to the
/// named canonical tag and contributes nothing else to the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub alias_of: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub aliases: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub parents: Vec<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub tag_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
}

/// `{ "tags": [TagRecord, ...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagDocument {
    #[serde(default)]
    pub tags: Vec<TagRecord>,
}

/// Summary entry carried by the search document (`{ tag, slug }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
}

/// `{ "images": [ImageRecord, ...], "tags": [TagSummary, ...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchDocument {
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    #[serde(default)]
    pub tags: Vec<TagSummary>,
}

/// An image as the search document describes it.
///
/// Only the fields the engine filters on are typed. Everything else
/// (thumbnails, dominant color, raw filenames) rides along in `extra` so the
/// rendering layer gets back exactly what it sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bucket: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_human: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorited_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageRecord {
    /// Stored orientation, or one derived from the pixel dimensions.
    pub fn orientation(&self) -> String {
        match self.orientation.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.to_lowercase(),
            _ => classify_orientation(self.width, self.height).to_string(),
        }
    }

    /// Stored size bucket, or one derived from the pixel count.
    pub fn size_bucket(&self) -> String {
        match self.size_bucket.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.to_lowercase(),
            _ => size_bucket(self.width, self.height).to_string(),
        }
    }

    /// Identity used for memoization; `None` when the record has no uuid.
    pub fn key(&self) -> Option<&str> {
        self.uuid.as_deref().filter(|uuid| !uuid.is_empty())
    }
}

// =============================================================================
// PARSED QUERY
// =============================================================================

/// Comparison operator attached to numeric, date and age values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
}

impl Comparison {
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            ">=" => Some(Comparison::Ge),
            ">" => Some(Comparison::Gt),
            "<=" => Some(Comparison::Le),
            "<" => Some(Comparison::Lt),
            "=" | "==" => Some(Comparison::Eq),
            _ => None,
        }
    }

    /// `>=` and `>` bound from below.
    pub fn is_lower_bound(self) -> bool {
        matches!(self, Comparison::Ge | Comparison::Gt)
    }

    /// `<=` and `<` bound from above.
    pub fn is_upper_bound(self) -> bool {
        matches!(self, Comparison::Le | Comparison::Lt)
    }
}

/// Inclusive integer range. Unset bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl NumericRange {
    /// Fold a comparison into the range. `>` is treated like `>=` (and `<` like `<=`).
    pub fn apply(&mut self, op: Comparison, value: u64) {
        match op {
            Comparison::Ge | Comparison::Gt => {
                self.min = Some(self.min.map_or(value, |min| min.max(value)));
            }
            Comparison::Le | Comparison::Lt => {
                self.max = Some(self.max.map_or(value, |max| max.min(value)));
            }
            Comparison::Eq => {
                self.min = Some(value);
                self.max = Some(value);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// A missing value fails any active range.
    pub fn admits(&self, value: Option<u64>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// Inclusive timestamp range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Raise the lower bound (later of current and new).
    pub fn raise_min(&mut self, value: DateTime<Utc>) {
        self.min = Some(self.min.map_or(value, |min| min.max(value)));
    }

    /// Lower the upper bound (earlier of current and new).
    pub fn lower_max(&mut self, value: DateTime<Utc>) {
        self.max = Some(self.max.map_or(value, |max| max.min(value)));
    }

    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, value: &DateTime<Utc>) -> bool {
        self.min.is_none_or(|min| *value >= min) && self.max.is_none_or(|max| *value <= max)
    }
}

/// Directive-level filters. `None` / inactive ranges mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub width: NumericRange,
    pub height: NumericRange,
    pub bytes: NumericRange,
    pub date: DateRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_min_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_max_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// Structured form of a free-text query, built fresh on every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub include_artists: Vec<String>,
    pub exclude_artists: Vec<String>,
    pub include_characters: Vec<String>,
    pub exclude_characters: Vec<String>,
    pub text_terms: Vec<String>,
    pub text_exclude: Vec<String>,
    pub filters: QueryFilters,
}

impl ParsedQuery {
    /// True when the query constrains nothing (sort alone does not count).
    pub fn is_empty(&self) -> bool {
        let filters = QueryFilters {
            sort: None,
            ..self.filters.clone()
        };
        self.include_tags.is_empty()
            && self.exclude_tags.is_empty()
            && self.include_artists.is_empty()
            && self.exclude_artists.is_empty()
            && self.include_characters.is_empty()
            && self.exclude_characters.is_empty()
            && self.text_terms.is_empty()
            && self.text_exclude.is_empty()
            && filters == QueryFilters::default()
    }
}

// =============================================================================
// FACETS
// =============================================================================

/// What the UI's tabs, pills and pickers currently select.
///
/// `"all"` and empty strings are treated as "no selection", matching how the
/// page initializes its controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetSelection {
    pub collection: Option<String>,
    pub orientation: Option<String>,
    pub size: Option<String>,
    /// Recency window in days (`time` pill).
    #[serde(alias = "time", deserialize_with = "lenient_u64")]
    pub time_window_days: Option<u64>,
    /// Single tag from the tag-cloud picker.
    pub tag: Option<String>,
    pub artist: Option<String>,
    pub character: Option<String>,
    /// `YYYY-MM` bucket of the favorite (or creation) date.
    pub month: Option<String>,
}

impl FacetSelection {
    /// Normalize a facet value: `None` for unset, empty or `"all"`.
    pub fn active(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty() && v != "all")
    }
}
