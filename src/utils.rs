// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Utility functions for tag names, record fields and dates.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Normalize a tag name: trim, strip one leading `#`, collapse whitespace, lowercase.
///
/// Every lookup in the tag index goes through this, so `#Cat  Ears`, `cat ears`
/// and ` CAT EARS ` all land on the same key.
///
/// # Algorithm (with unicode-normalization feature)
///
/// 1. Trim and strip a single leading `#`
/// 2. NFC compose (so precomposed and decomposed accents compare equal)
/// 3. Collapse whitespace runs to one space
/// 4. Lowercase
pub fn normalize_tag_name(value: &str) -> String {
    let trimmed = value.trim();
    normalize_text(trimmed.strip_prefix('#').unwrap_or(trimmed))
}

/// Normalize free text: NFC compose, collapse whitespace, lowercase.
///
/// Query terms and record haystacks both go through this, so a phrase matches
/// regardless of spacing or accent encoding on either side.
pub fn normalize_text(value: &str) -> String {
    compose(value)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(feature = "unicode-normalization")]
fn compose(value: &str) -> String {
    value.nfc().collect()
}

/// Without unicode-normalization (e.g. lean WASM builds), input is taken as-is.
#[cfg(not(feature = "unicode-normalization"))]
fn compose(value: &str) -> String {
    value.to_string()
}

/// URL-safe slug fallback for tags that carry no explicit slug.
pub fn safe_tag_slug(tag: &str) -> String {
    let slug = normalize_tag_name(tag).replace(['/', '\\'], "-");
    let slug = slug.trim();
    if slug.is_empty() {
        "tag".to_string()
    } else {
        slug.to_string()
    }
}

/// Push `value` unless it is already present. Keeps first-seen order.
pub(crate) fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

// =============================================================================
// DERIVED FACETS
// =============================================================================

/// Orientation bucket from pixel dimensions.
///
/// A 10% tolerance keeps near-square images out of the landscape/portrait buckets.
pub fn classify_orientation(width: Option<u64>, height: Option<u64>) -> &'static str {
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => {
            let (w, h) = (w as f64, h as f64);
            if w / h >= 1.1 {
                "landscape"
            } else if h / w >= 1.1 {
                "portrait"
            } else {
                "square"
            }
        }
        _ => "unknown",
    }
}

/// Size bucket from total pixel count.
pub fn size_bucket(width: Option<u64>, height: Option<u64>) -> &'static str {
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => {
            let pixels = w.saturating_mul(h);
            if pixels >= 12_000_000 {
                "ultra"
            } else if pixels >= 6_000_000 {
                "large"
            } else if pixels >= 3_000_000 {
                "medium"
            } else {
                "compact"
            }
        }
        _ => "unknown",
    }
}

/// Human-readable byte count: `512B`, `1.5KB`, `3.2MB`.
pub fn human_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{}B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    for unit in ["KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{:.1}{}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1}TB", value)
}

// =============================================================================
// DATES
// =============================================================================

/// Parse a timestamp the way record fields show up in practice.
///
/// Accepts RFC 3339 (`2024-06-01T12:00:00Z`), naive date-times with `T` or a
/// space (taken as UTC), and bare dates (midnight UTC). Anything else is `None`.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    // Unix timestamps: seconds, or milliseconds past 1e11
    if value.len() >= 9 && value.bytes().all(|b| b.is_ascii_digit()) {
        let raw: i64 = value.parse().ok()?;
        return if raw >= 100_000_000_000 {
            DateTime::from_timestamp_millis(raw)
        } else {
            DateTime::from_timestamp(raw, 0)
        };
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    parse_naive_date(value).map(start_of_day)
}

fn parse_naive_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
        .ok()
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
}

/// Inclusive `[start, end]` span covered by a date expression.
///
/// `2024` covers the whole year, `2024-06` the month, `2024-06-01` the day,
/// and a full timestamp just that instant.
pub fn parse_date_span(value: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let value = value.trim();
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = value.parse().ok()?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let next = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
        return Some(span(start, next));
    }
    if let Some((year, month)) = value.split_once(['-', '/']) {
        if year.len() == 4 && (1..=2).contains(&month.len()) {
            let year: i32 = year.parse().ok()?;
            let month: u32 = month.parse().ok()?;
            let start = NaiveDate::from_ymd_opt(year, month, 1)?;
            let next = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)?
            };
            return Some(span(start, next));
        }
    }
    if let Some(date) = parse_naive_date(value) {
        return Some(span(date, date.succ_opt()?));
    }
    parse_datetime(value).map(|dt| (dt, dt))
}

fn span(start: NaiveDate, next: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (
        start_of_day(start),
        start_of_day(next) - Duration::milliseconds(1),
    )
}

/// `YYYY-MM` bucket used by the month facet.
pub fn format_month(dt: &DateTime<Utc>) -> String {
    format!("{:04}-{:02}", dt.year(), dt.month())
}

// =============================================================================
// LENIENT FIELD DECODING
// =============================================================================
//
// Search documents are generated by a separate pipeline and fields drift:
// numbers arrive as strings, timestamps as integers, nulls everywhere. These
// decoders never fail; anything unusable becomes `None`.

pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_u64))
}

fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.is_finite()).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accepts a list of strings, a single delimited string, or junk (empty list).
pub(crate) fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s
            .split([',', '|', '\n'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}
