// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine options.
//!
//! Every field has a default, so `{}` is a valid config file and partial files
//! only override what they name.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tags::{PREFIX_MIN_LEN, SUGGESTION_LIMIT};

/// Number of artists kept by `facet_counts`.
pub const ARTIST_FACET_LIMIT: usize = 10;

/// What to do with `key:value` tokens whose key is not a known directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownDirectivePolicy {
    /// Drop the token.
    #[default]
    Ignore,
    /// Treat the whole token as a bareword (tag or free text).
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    pub suggestion_limit: usize,
    pub prefix_min_len: usize,
    /// Resolve barewords through unique prefixes (`cat_e` → `cat_ears`).
    pub prefix_matching: bool,
    pub unknown_directives: UnknownDirectivePolicy,
    pub artist_facet_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            suggestion_limit: SUGGESTION_LIMIT,
            prefix_min_len: PREFIX_MIN_LEN,
            prefix_matching: true,
            unknown_directives: UnknownDirectivePolicy::Ignore,
            artist_facet_limit: ARTIST_FACET_LIMIT,
        }
    }
}

impl EngineOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|err| Error::json("engine options", err))?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.prefix_min_len == 0 {
            return Err(Error::Config("prefix_min_len must be at least 1".into()));
        }
        Ok(())
    }
}
