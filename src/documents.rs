// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Loading the two JSON documents the engine consumes.
//!
//! - `tag_index.json` degrades: anything unreadable as a tag document becomes
//!   an empty index (with a warning), because a gallery without tag metadata
//!   should still search by text.
//! - `search_index.json` is required: without it there is nothing to search,
//!   so malformed JSON is an error. Individual malformed records are skipped.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::tags::TagIndex;
use crate::types::{ImageRecord, SearchDocument, TagDocument, TagRecord, TagSummary};

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| Error::io(path, err))
}

/// Read a tag document from disk. I/O failures are errors; bad content is not.
pub fn read_tag_index(path: &Path) -> Result<TagIndex> {
    let json = read(path)?;
    let index = TagIndex::from_json_str(&json);
    info!(
        path = %path.display(),
        tags = index.canonical_tags().len(),
        "loaded tag index"
    );
    Ok(index)
}

/// Read a tag document strictly: invalid JSON is an error, malformed entries
/// are still skipped. For tooling that wants to report on the document rather
/// than search with it.
pub fn read_tag_document(path: &Path) -> Result<TagDocument> {
    let json = read(path)?;
    let value: Value =
        serde_json::from_str(&json).map_err(|err| Error::json("tag document", err))?;
    Ok(TagDocument::from_value(&value))
}

impl TagDocument {
    /// Entries of the `tags` array that decode as tag records.
    pub fn from_value(value: &Value) -> Self {
        Self {
            tags: decode_each::<TagRecord>(value.get("tags"), "tag entry"),
        }
    }
}

impl SearchDocument {
    /// Decode leniently: unknown fields are kept, malformed records skipped.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(Error::Config("search document must be a JSON object".into()));
        };
        let images = decode_each::<ImageRecord>(object.get("images"), "image record");
        let tags = decode_each::<TagSummary>(object.get("tags"), "tag summary");
        Ok(Self { images, tags })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|err| Error::json("search document", err))?;
        Self::from_value(&value)
    }
}

fn decode_each<T: serde::de::DeserializeOwned>(value: Option<&Value>, what: &str) -> Vec<T> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value(item.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                debug!(position, %err, "skipping malformed {}", what);
                None
            }
        })
        .collect()
}

/// Read a search document from disk.
pub fn read_search_document(path: &Path) -> Result<SearchDocument> {
    let document = SearchDocument::from_json_str(&read(path)?)?;
    info!(
        path = %path.display(),
        images = document.images.len(),
        "loaded search document"
    );
    Ok(document)
}
