// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::tags::TagIndex;
use crate::types::{ImageRecord, TagRecord};

/// A canonical tag with no parents.
pub fn tag(name: &str) -> TagRecord {
    TagRecord {
        tag: Some(name.to_string()),
        ..Default::default()
    }
}

/// An alias entry redirecting `name` to `canonical`.
pub fn alias(name: &str, canonical: &str) -> TagRecord {
    TagRecord {
        tag: Some(name.to_string()),
        alias_of: Some(canonical.to_string()),
        ..Default::default()
    }
}

/// A canonical tag with direct parents.
pub fn child(name: &str, parents: &[&str]) -> TagRecord {
    TagRecord {
        tag: Some(name.to_string()),
        parents: parents.iter().map(|p| p.to_string()).collect(),
        ..Default::default()
    }
}

/// A canonical tag of the given type (`artist`, `character`, ...).
pub fn typed(name: &str, tag_type: &str) -> TagRecord {
    TagRecord {
        tag: Some(name.to_string()),
        tag_type: Some(tag_type.to_string()),
        ..Default::default()
    }
}

/// An image with a uuid and raw tags; everything else unset.
pub fn image(uuid: &str, tags: &[&str]) -> ImageRecord {
    ImageRecord {
        uuid: Some(uuid.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

/// An image with dimensions (orientation and size are derived from them).
pub fn image_sized(uuid: &str, width: u64, height: u64) -> ImageRecord {
    ImageRecord {
        width: Some(width),
        height: Some(height),
        ..image(uuid, &[])
    }
}

/// An image created at the given timestamp.
pub fn image_dated(uuid: &str, created_at: &str) -> ImageRecord {
    ImageRecord {
        created_at: Some(created_at.to_string()),
        ..image(uuid, &[])
    }
}

/// Small vocabulary used across tests:
///
/// ```text
/// animal ← cat ← kitten        (kitty, neko → cat)
/// animal_ears ← cat_ears       (nekomimi → cat_ears)
/// hokusai [artist]   miku [character]   sky
/// ```
pub fn sample_tag_index() -> TagIndex {
    TagIndex::build(&[
        tag("animal"),
        child("cat", &["animal"]),
        child("kitten", &["cat"]),
        alias("kitty", "cat"),
        alias("neko", "cat"),
        tag("animal_ears"),
        child("cat_ears", &["animal_ears"]),
        alias("nekomimi", "cat_ears"),
        typed("hokusai", "artist"),
        typed("miku", "character"),
        tag("sky"),
    ])
}

/// Uuids of an evaluation result, for compact assertions.
pub fn uuids(records: &[&ImageRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.uuid.clone().unwrap_or_default())
        .collect()
}
