// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Directive vocabulary and value parsers.
//!
//! A directive is a `key:value` (or `key=value`) token. Keys are matched
//! case-insensitively against a fixed synonym table; values are parsed by the
//! helpers below, each returning `None` for anything malformed so the caller
//! can drop the directive and keep going.
//!
//! | Directive     | Keys                                   |
//! |---------------|----------------------------------------|
//! | `Tag`         | `tag` `tags` `t`                       |
//! | `Artist`      | `artist` `a`                           |
//! | `Character`   | `character` `ch`                       |
//! | `Collection`  | `collection` `col` `c` `album`         |
//! | `Orientation` | `orientation` `ori` `o`                |
//! | `Size`        | `size` `quality` `q`                   |
//! | `Sort`        | `sort` `order`                         |
//! | `Width`       | `width` `w`                            |
//! | `Height`      | `height` `h`                           |
//! | `Bytes`       | `bytes` `b`                            |
//! | `Date`        | `date` `created` `time`                |
//! | `After`       | `after` `since`                        |
//! | `Before`      | `before` `until`                       |
//! | `Age`         | `age` `day` `days`                     |
//! | `Text`        | `text` `title` `desc` `description`    |
//! | `Favorites`   | `fav` `favs` `favorite` `favorites`    |

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::types::Comparison;
use crate::utils::parse_date_span;

/// `key:value` / `key=value`.
pub(crate) static DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([a-zA-Z_]+)\s*[:=]\s*(.+)$").expect("static regex"));

/// `width>=3000`, `h<800` without the colon.
pub(crate) static BARE_NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(width|height|bytes|w|h|b)\s*(>=|<=|>|<)\s*(\d+)$").expect("static regex")
});

/// `date<2024-01-01`, `created>=2023-06`.
pub(crate) static BARE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(date|created|time)\s*(>=|<=|>|<)\s*(\S+)$").expect("static regex")
});

/// `age7`, `age<2w`, `days>30`.
pub(crate) static BARE_AGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(age|days?)\s*((?:>=|<=|>|<)?\s*\d+\s*[a-z]*)$").expect("static regex")
});

static NUMERIC_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(>=|<=|=|>|<)?\s*(\d+)$").expect("static regex"));

static AGE_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(>=|<=|=|>|<)?\s*(\d+)\s*(d|days?|w|weeks?|m|months?)?$")
        .expect("static regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Tag,
    Artist,
    Character,
    Collection,
    Orientation,
    Size,
    Sort,
    Width,
    Height,
    Bytes,
    Date,
    After,
    Before,
    Age,
    Text,
    Favorites,
}

impl Directive {
    pub fn from_key(key: &str) -> Option<Self> {
        let directive = match key.to_ascii_lowercase().as_str() {
            "tag" | "tags" | "t" => Directive::Tag,
            "artist" | "a" => Directive::Artist,
            "character" | "ch" => Directive::Character,
            "collection" | "col" | "c" | "album" => Directive::Collection,
            "orientation" | "ori" | "o" => Directive::Orientation,
            "size" | "quality" | "q" => Directive::Size,
            "sort" | "order" => Directive::Sort,
            "width" | "w" => Directive::Width,
            "height" | "h" => Directive::Height,
            "bytes" | "b" => Directive::Bytes,
            "date" | "created" | "time" => Directive::Date,
            "after" | "since" => Directive::After,
            "before" | "until" => Directive::Before,
            "age" | "day" | "days" => Directive::Age,
            "text" | "title" | "desc" | "description" => Directive::Text,
            "fav" | "favs" | "favorite" | "favorites" => Directive::Favorites,
            _ => return None,
        };
        Some(directive)
    }

    /// Directives with an exclude side. The rest set a single value, and a
    /// leading `-` on them is dropped.
    pub fn is_negatable(self) -> bool {
        matches!(
            self,
            Directive::Tag | Directive::Artist | Directive::Character | Directive::Text
        )
    }
}

// =============================================================================
// SYNONYM TABLES
// =============================================================================

pub fn orientation_synonym(value: &str) -> String {
    let value = value.trim().to_lowercase();
    let canonical = match value.as_str() {
        "p" | "vertical" => "portrait",
        "l" | "horizontal" => "landscape",
        "s" => "square",
        v if v.starts_with("port") => "portrait",
        v if v.starts_with("land") => "landscape",
        v if v.starts_with("square") => "square",
        _ => return value,
    };
    canonical.to_string()
}

pub fn size_synonym(value: &str) -> String {
    let value = value.trim().to_lowercase();
    let canonical = match value.as_str() {
        "u" | "xl" => "ultra",
        "l" | "hd" => "large",
        "m" | "md" => "medium",
        "c" | "sm" => "compact",
        v if v.starts_with("ultra") => "ultra",
        v if v.starts_with("large") => "large",
        v if v.starts_with("medium") => "medium",
        v if v.starts_with("compact") => "compact",
        _ => return value,
    };
    canonical.to_string()
}

// =============================================================================
// VALUE PARSERS
// =============================================================================

/// `3000`, `>=3000`, `< 800`. A bare number pins the value (`=`).
pub fn parse_numeric(value: &str) -> Option<(Comparison, u64)> {
    let caps = NUMERIC_VALUE_RE.captures(value.trim())?;
    let op = caps
        .get(1)
        .and_then(|op| Comparison::parse(op.as_str()))
        .unwrap_or(Comparison::Eq);
    let number = caps.get(2)?.as_str().parse().ok()?;
    Some((op, number))
}

/// Age in days: `7`, `7d`, `2w` (×7), `3m` (×30), with optional comparison.
///
/// No operator means "at most" (`age:7` is the last week).
pub fn parse_age(value: &str) -> Option<(Comparison, u32)> {
    let caps = AGE_VALUE_RE.captures(value.trim())?;
    let op = caps
        .get(1)
        .and_then(|op| Comparison::parse(op.as_str()))
        .unwrap_or(Comparison::Le);
    let magnitude: u32 = caps.get(2)?.as_str().parse().ok()?;
    let unit = caps
        .get(3)
        .map(|u| u.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    let factor = match unit.chars().next() {
        Some('w') => 7,
        Some('m') => 30,
        _ => 1,
    };
    Some((op, magnitude.saturating_mul(factor)))
}

/// Bounds produced by a date directive value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
}

/// `2024`, `2024-06`, `2024-06-01`, `2024-01..2024-03`, `>=2024`, `<2023-12-31`.
///
/// Each side of a range covers its whole span: `2024-01..2024-03` runs from
/// the first instant of January to the last instant of March. A leading
/// operator keeps only one side.
pub fn parse_date_value(value: &str) -> Option<DateBounds> {
    let value = value.trim();
    let (op, rest) = split_operator(value);
    let rest = rest.trim();

    let bounds = match rest.split_once("..") {
        Some((start, end)) => {
            let min = match start.trim() {
                "" => None,
                s => Some(parse_date_span(s)?.0),
            };
            let max = match end.trim() {
                "" => None,
                e => Some(parse_date_span(e)?.1),
            };
            if min.is_none() && max.is_none() {
                return None;
            }
            DateBounds { min, max }
        }
        None => {
            let (start, end) = parse_date_span(rest)?;
            DateBounds {
                min: Some(start),
                max: Some(end),
            }
        }
    };

    Some(match op {
        Some(op) if op.is_lower_bound() => DateBounds {
            max: None,
            ..bounds
        },
        Some(op) if op.is_upper_bound() => DateBounds {
            min: None,
            ..bounds
        },
        _ => bounds,
    })
}

fn split_operator(value: &str) -> (Option<Comparison>, &str) {
    for op in [">=", "<=", ">", "<", "="] {
        if let Some(rest) = value.strip_prefix(op) {
            return (Comparison::parse(op), rest);
        }
    }
    (None, value)
}
