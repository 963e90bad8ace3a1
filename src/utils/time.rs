//! time formatting

use std::time::SystemTime;

use chrono::{DateTime, TimeZone, Utc};

/// HTTP date format (RFC 1123, always GMT)
///
/// See <https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers/Last-Modified>
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %T GMT";

/// ISO 8601 format used in XML listings
const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// convert a unix timestamp to `DateTime<Utc>`, clamping negative values to the epoch
fn utc_from_timestamp(t: i64) -> DateTime<Utc> {
    match Utc.timestamp_opt(t.max(0), 0) {
        chrono::LocalResult::Single(dt) => dt,
        _ => Utc.timestamp_opt(0, 0).unwrap(),
    }
}

/// format a unix timestamp as an HTTP date (exactly 29 bytes)
pub fn format_http_date(t: i64) -> String {
    utc_from_timestamp(t).format(HTTP_DATE_FORMAT).to_string()
}

/// format a unix timestamp as `YYYY-MM-DDTHH:MM:SSZ` (exactly 20 bytes)
pub fn format_iso8601(t: i64) -> String {
    utc_from_timestamp(t).format(ISO8601_FORMAT).to_string()
}

/// unix timestamp of a `SystemTime`
fn unix_timestamp(time: SystemTime) -> i64 {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(_) => 0,
    }
}

/// convert a `SystemTime` to an HTTP date string
pub fn to_http_date(time: SystemTime) -> String {
    format_http_date(unix_timestamp(time))
}

/// convert a `SystemTime` to an ISO 8601 string
pub fn to_iso8601(time: SystemTime) -> String {
    format_iso8601(unix_timestamp(time))
}
