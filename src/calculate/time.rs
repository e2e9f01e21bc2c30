//! Upstream timestamp normalization.
//!
//! Upstream sends compact timestamps such as `20250615T210000.000Z`.
//! The dashboard consumes separated ISO-8601 (`2025-06-15T21:00:00.000Z`).

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use tracing::debug;

static COMPACT_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})T(\d{2})(\d{2})(\d{2})\.(\d{3})Z$")
        .expect("compact timestamp pattern is valid")
});

/// Naive layouts tried after RFC 3339 / RFC 2822, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y%m%dT%H%M%SZ",
    "%Y%m%dT%H%M%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Convert an upstream timestamp to `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// The compact upstream layout is reformatted textually. Anything else goes
/// through a generic parse and is re-rendered in UTC with millisecond
/// precision. Unparseable input yields `None`.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(caps) = COMPACT_TIMESTAMP.captures(raw) {
        return Some(format!(
            "{}-{}-{}T{}:{}:{}.{}Z",
            &caps[1], &caps[2], &caps[3], &caps[4], &caps[5], &caps[6], &caps[7]
        ));
    }

    debug!("Timestamp {:?} is not compact, trying generic parse", raw);
    parse_generic(raw).map(format_utc)
}

/// `normalize_timestamp` lifted over an optional field.
pub fn normalize_opt(raw: Option<&str>) -> Option<String> {
    raw.and_then(normalize_timestamp)
}

/// Render an instant the way the dashboard expects it.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_generic(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
