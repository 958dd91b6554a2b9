// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query parser: tokens in, `ParsedQuery` out.
//!
//! Every token is classified exactly once, in this order:
//!
//! 1. A leading `-` marks it negated (and is stripped).
//! 2. `key:value` / `key=value` is a directive.
//! 3. `width>=3000`, `date<2024`, `age7` are directives without the colon.
//! 4. Anything else is a bareword: a tag if it has a `#`, is a known spelling,
//!    or is a unique prefix of one; free text otherwise.
//!
//! Parsing never fails. A directive with a malformed value is dropped and the
//! rest of the query still applies.

use tracing::debug;

use super::directives::{
    orientation_synonym, parse_age, parse_date_value, parse_numeric, size_synonym, Directive,
    BARE_AGE_RE, BARE_DATE_RE, BARE_NUMERIC_RE, DIRECTIVE_RE,
};
use super::options::{EngineOptions, UnknownDirectivePolicy};
use super::tokenizer::tokenize;
use crate::tags::TagIndex;
use crate::types::{Comparison, ParsedQuery};
use crate::utils::{normalize_tag_name, normalize_text, parse_date_span, push_unique};

/// Parse with default options.
pub fn parse_query(input: &str, index: &TagIndex) -> ParsedQuery {
    parse_query_with(input, index, &EngineOptions::default())
}

pub fn parse_query_with(input: &str, index: &TagIndex, options: &EngineOptions) -> ParsedQuery {
    let mut parser = QueryParser {
        index,
        options,
        query: ParsedQuery::default(),
    };
    for token in tokenize(input) {
        parser.token(&token);
    }

    #[cfg(debug_assertions)]
    crate::verify::contracts::check_query_deduplicated(&parser.query);

    parser.query
}

struct QueryParser<'a> {
    index: &'a TagIndex,
    options: &'a EngineOptions,
    query: ParsedQuery,
}

/// Which include/exclude pair a tag-like value lands in.
#[derive(Clone, Copy)]
enum TagSide {
    Tags,
    Artists,
    Characters,
}

impl QueryParser<'_> {
    fn token(&mut self, token: &str) {
        let (negated, body) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        if body.trim().is_empty() {
            return;
        }

        if let Some(caps) = DIRECTIVE_RE.captures(body) {
            let key = caps.get(1).map_or("", |m| m.as_str());
            let value = caps.get(2).map_or("", |m| m.as_str()).trim();
            match Directive::from_key(key) {
                Some(directive) => {
                    if !value.is_empty() {
                        self.directive(directive, value, negated);
                    }
                    return;
                }
                None => match self.options.unknown_directives {
                    UnknownDirectivePolicy::Ignore => {
                        debug!(key, "ignoring unknown directive");
                        return;
                    }
                    UnknownDirectivePolicy::FreeText => {}
                },
            }
        }

        if self.bare_comparison(body, negated) {
            return;
        }
        self.bareword(body, negated);
    }

    fn bare_comparison(&mut self, body: &str, negated: bool) -> bool {
        let (value, directive) = if let Some(caps) = BARE_NUMERIC_RE.captures(body) {
            let value = format!("{}{}", &caps[2], &caps[3]);
            (value, Directive::from_key(&caps[1]))
        } else if let Some(caps) = BARE_DATE_RE.captures(body) {
            let value = format!("{}{}", &caps[2], &caps[3]);
            (value, Some(Directive::Date))
        } else if let Some(caps) = BARE_AGE_RE.captures(body) {
            (caps[2].to_string(), Some(Directive::Age))
        } else {
            return false;
        };
        match directive {
            Some(directive) => {
                self.directive(directive, &value, negated);
                true
            }
            None => false,
        }
    }

    fn directive(&mut self, directive: Directive, value: &str, negated: bool) {
        if negated && !directive.is_negatable() {
            debug!(?directive, value, "dropping negated directive");
            return;
        }
        let filters = &mut self.query.filters;
        match directive {
            Directive::Tag => self.tag_list(value, negated, TagSide::Tags),
            Directive::Artist => self.tag_list(value, negated, TagSide::Artists),
            Directive::Character => self.tag_list(value, negated, TagSide::Characters),
            Directive::Collection => filters.collection = Some(value.to_lowercase()),
            Directive::Orientation => filters.orientation = Some(orientation_synonym(value)),
            Directive::Size => filters.size = Some(size_synonym(value)),
            Directive::Sort => filters.sort = Some(value.trim().to_lowercase()),
            Directive::Width | Directive::Height | Directive::Bytes => {
                let Some((op, number)) = parse_numeric(value) else {
                    debug!(?directive, value, "malformed numeric value");
                    return;
                };
                let range = match directive {
                    Directive::Width => &mut filters.width,
                    Directive::Height => &mut filters.height,
                    _ => &mut filters.bytes,
                };
                range.apply(op, number);
            }
            Directive::Date => {
                let Some(bounds) = parse_date_value(value) else {
                    debug!(value, "malformed date value");
                    return;
                };
                if let Some(min) = bounds.min {
                    filters.date.raise_min(min);
                }
                if let Some(max) = bounds.max {
                    filters.date.lower_max(max);
                }
            }
            Directive::After | Directive::Before => {
                let Some((start, end)) = parse_date_span(value) else {
                    debug!(?directive, value, "malformed date value");
                    return;
                };
                if directive == Directive::After {
                    filters.date.raise_min(start);
                } else {
                    filters.date.lower_max(end);
                }
            }
            Directive::Age => {
                let Some((op, days)) = parse_age(value) else {
                    debug!(value, "malformed age value");
                    return;
                };
                self.age(op, days);
            }
            Directive::Text => {
                self.text(normalize_text(value), negated);
            }
            Directive::Favorites => {}
        }
    }

    fn age(&mut self, op: Comparison, days: u32) {
        let filters = &mut self.query.filters;
        if op.is_lower_bound() {
            filters.age_min_days = Some(filters.age_min_days.map_or(days, |d| d.max(days)));
        } else {
            filters.age_max_days = Some(filters.age_max_days.map_or(days, |d| d.min(days)));
        }
    }

    /// `tag:a,b|c`: each part normalized and alias-resolved.
    fn tag_list(&mut self, value: &str, negated: bool, side: TagSide) {
        for part in value.split([',', '|']) {
            let canonical = self.index.resolve_raw(part);
            if !canonical.is_empty() {
                self.tag(canonical, negated, side);
            }
        }
    }

    fn tag(&mut self, canonical: String, negated: bool, side: TagSide) {
        let query = &mut self.query;
        let list = match (side, negated) {
            (TagSide::Tags, false) => &mut query.include_tags,
            (TagSide::Tags, true) => &mut query.exclude_tags,
            (TagSide::Artists, false) => &mut query.include_artists,
            (TagSide::Artists, true) => &mut query.exclude_artists,
            (TagSide::Characters, false) => &mut query.include_characters,
            (TagSide::Characters, true) => &mut query.exclude_characters,
        };
        push_unique(list, canonical);
    }

    fn text(&mut self, term: String, negated: bool) {
        if term.is_empty() {
            return;
        }
        let list = if negated {
            &mut self.query.text_exclude
        } else {
            &mut self.query.text_terms
        };
        push_unique(list, term);
    }

    fn bareword(&mut self, body: &str, negated: bool) {
        let normalized = normalize_tag_name(body);
        if normalized.is_empty() {
            return;
        }
        let canonical = if body.trim_start().starts_with('#') {
            Some(self.index.resolve(&normalized))
        } else if let Some(canonical) = self.index.canonical_of(&normalized) {
            Some(canonical.to_string())
        } else if self.options.prefix_matching {
            self.index
                .resolve_prefix_min(&normalized, self.options.prefix_min_len)
        } else {
            None
        };
        match canonical {
            Some(tag) => self.tag(tag, negated, TagSide::Tags),
            None => self.text(normalized, negated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_tag_index;
    use chrono::{TimeZone, Utc};

    #[test]
    fn barewords_resolve_through_aliases() {
        let query = parse_query("Kitty -nekomimi", &sample_tag_index());
        assert_eq!(query.include_tags, ["cat"]);
        assert_eq!(query.exclude_tags, ["cat_ears"]);
        assert!(query.text_terms.is_empty());
    }

    #[test]
    fn unknown_barewords_become_text() {
        let query = parse_query("sunset -blurry", &TagIndex::empty());
        assert_eq!(query.text_terms, ["sunset"]);
        assert_eq!(query.text_exclude, ["blurry"]);
    }

    #[test]
    fn hash_forces_a_tag() {
        let query = parse_query("#sunset", &TagIndex::empty());
        assert_eq!(query.include_tags, ["sunset"]);
    }

    #[test]
    fn unique_prefix_is_a_tag() {
        let index = sample_tag_index();
        assert_eq!(parse_query("hoku", &index).include_tags, ["hokusai"]);
        // `cat` and `cat_ears` both start with `ca`
        assert_eq!(parse_query("ca", &index).text_terms, ["ca"]);

        let options = EngineOptions {
            prefix_matching: false,
            ..EngineOptions::default()
        };
        assert_eq!(parse_query_with("hoku", &index, &options).text_terms, ["hoku"]);
    }

    #[test]
    fn tag_directive_splits_values() {
        let query = parse_query(r#"tag:kitty,sky|"cat ears" -t:neko"#, &sample_tag_index());
        assert_eq!(query.include_tags, ["cat", "sky", "cat ears"]);
        assert_eq!(query.exclude_tags, ["cat"]);
    }

    #[test]
    fn scalar_directives() {
        let query = parse_query("c:Wallpapers ori:p q:xl sort:NEW", &TagIndex::empty());
        assert_eq!(query.filters.collection.as_deref(), Some("wallpapers"));
        assert_eq!(query.filters.orientation.as_deref(), Some("portrait"));
        assert_eq!(query.filters.size.as_deref(), Some("ultra"));
        assert_eq!(query.filters.sort.as_deref(), Some("new"));
    }

    #[test]
    fn negated_scalar_directives_are_dropped() {
        let query = parse_query("-collection:art -width>=10 -sort:new", &TagIndex::empty());
        assert_eq!(query, ParsedQuery::default());
    }

    #[test]
    fn numeric_ranges_tighten() {
        let query = parse_query("width>=3000 w:>=2000 width<=5000 h=1080 bytes:wat", &TagIndex::empty());
        assert_eq!(query.filters.width.min, Some(3000));
        assert_eq!(query.filters.width.max, Some(5000));
        assert_eq!((query.filters.height.min, query.filters.height.max), (Some(1080), Some(1080)));
        assert!(!query.filters.bytes.is_active());
        assert!(query.text_terms.is_empty());
    }

    #[test]
    fn date_directives() {
        let query = parse_query("date:2024 before:2024-06-15 date<2024-09", &TagIndex::empty());
        assert_eq!(query.filters.date.min, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        let max = query.filters.date.max.unwrap();
        assert!(max > Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap());
        assert!(max < Utc.with_ymd_and_hms(2024, 6, 16, 0, 0, 0).unwrap());

        let since = parse_query("since:2023-03", &TagIndex::empty());
        assert_eq!(since.filters.date.min, Some(Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap()));
        assert_eq!(since.filters.date.max, None);
    }

    #[test]
    fn age_directives() {
        let query = parse_query("age:2w days>30 age7", &TagIndex::empty());
        assert_eq!(query.filters.age_max_days, Some(7));
        assert_eq!(query.filters.age_min_days, Some(30));
    }

    #[test]
    fn text_directive_keeps_phrases() {
        let query = parse_query(r#"title:"Blue  Hour" -desc:draft"#, &TagIndex::empty());
        assert_eq!(query.text_terms, ["blue hour"]);
        assert_eq!(query.text_exclude, ["draft"]);
    }

    #[test]
    fn artist_and_character_directives() {
        let query = parse_query("a:Hokusai -ch:miku fav:yes", &sample_tag_index());
        assert_eq!(query.include_artists, ["hokusai"]);
        assert_eq!(query.exclude_characters, ["miku"]);
        assert!(query.text_terms.is_empty());
    }

    #[test]
    fn unknown_directive_policy() {
        let index = sample_tag_index();
        assert_eq!(parse_query("bogus:value #cat", &index).include_tags, ["cat"]);
        assert!(parse_query("bogus:value", &index).text_terms.is_empty());

        let options = EngineOptions {
            unknown_directives: UnknownDirectivePolicy::FreeText,
            ..EngineOptions::default()
        };
        assert_eq!(parse_query_with("bogus:value", &index, &options).text_terms, ["bogus:value"]);
    }

    #[test]
    fn lists_are_deduplicated() {
        let query = parse_query("cat kitty neko tag:cat sky sky", &sample_tag_index());
        assert_eq!(query.include_tags, ["cat", "sky"]);
    }
}
