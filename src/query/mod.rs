// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query language: from what the user typed to a `ParsedQuery`.
//!
//! The pipeline is tokenizer → directive table → parser. The tag index is the
//! only outside input; it decides whether a bareword is a tag or free text.

pub mod directives;
mod options;
mod parser;
mod tokenizer;

pub use directives::Directive;
pub use options::{EngineOptions, UnknownDirectivePolicy, ARTIST_FACET_LIMIT};
pub use parser::{parse_query, parse_query_with};
pub use tokenizer::tokenize;
