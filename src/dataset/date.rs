use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Offset-aware formats, tried in order.
const ZONED_FORMATS: &[&str] = &[
    "%a %b %d %H:%M:%S %z %Y",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Formats without an offset, read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// US zone abbreviations seen in the tweet dumps, chrono cannot parse `%Z`.
const ZONE_ABBREVIATIONS: &[(&str, &str)] = &[
    (" PDT ", " -0700 "),
    (" PST ", " -0800 "),
    (" MDT ", " -0600 "),
    (" MST ", " -0700 "),
    (" CDT ", " -0500 "),
    (" CST ", " -0600 "),
    (" EDT ", " -0400 "),
    (" EST ", " -0500 "),
    (" UTC ", " +0000 "),
    (" GMT ", " +0000 "),
];

/// Unix seconds, or milliseconds when the value is too large to be seconds.
fn from_unix(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    if value.abs() > 1e11 {
        Utc.timestamp_millis_opt(value as i64).single()
    } else {
        Utc.timestamp_opt(value as i64, 0).single()
    }
}

/// Parse a timestamp string in any of the formats the datasets use.
pub fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(num) = raw.parse::<f64>() {
        return from_unix(num);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let mut zoned = format!(" {raw} ");
    for (abbr, offset) in ZONE_ABBREVIATIONS {
        zoned = zoned.replace(abbr, offset);
    }
    let zoned = zoned.trim();
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(zoned, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}

/// Parse a raw JSON timestamp.
///
/// Accepts unix numbers, date strings and extended JSON `{"$date": ...}`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_unix),
        Value::String(s) => parse_timestamp_str(s),
        Value::Object(map) => map
            .get("$date")
            .or_else(|| map.get("$numberLong"))
            .and_then(parse_timestamp),
        _ => None,
    }
}
