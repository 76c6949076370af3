//! HTTP conditional request module
//!
//! `Last-Modified` formatting and `If-Modified-Since` evaluation.
//! Responses are never cacheable, but a revalidating client may still get a 304.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Parse an HTTP date, `None` if it is malformed
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Decide whether a file response can be answered with `304 Not Modified`
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; since no `ETag` is
/// ever issued, its presence always means a full response.
/// The modification time is compared at whole-second precision.
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }

    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };

    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn rfc_example_time() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(784_111_777)
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(
            format_http_date(rfc_example_time()),
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn test_parse_http_date() {
        let parsed = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(parsed.timestamp(), 784_111_777);
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_not_modified_same_second() {
        let modified = rfc_example_time() + Duration::from_millis(450);
        assert!(is_not_modified(
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
            false,
            modified
        ));
    }

    #[test]
    fn test_modified_after_date() {
        let modified = rfc_example_time() + Duration::from_secs(1);
        assert!(!is_not_modified(
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
            false,
            modified
        ));
    }

    #[test]
    fn test_if_none_match_wins() {
        assert!(!is_not_modified(
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
            true,
            rfc_example_time()
        ));
    }

    #[test]
    fn test_missing_or_bad_header() {
        assert!(!is_not_modified(None, false, rfc_example_time()));
        assert!(!is_not_modified(Some("not a date"), false, rfc_example_time()));
    }
}
