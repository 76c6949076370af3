//! Response header policy
//!
//! Every response leaving the handler must say "never cache me" to browsers and
//! proxies and must be readable from any origin. Values are byte-exact.

use hyper::header::{HeaderMap, HeaderName, HeaderValue, SERVER};

/// The three no-cache headers followed by the CORS header
pub const NO_CACHE_HEADERS: [(&str, &str); 4] = [
    ("cache-control", "no-store, no-cache, must-revalidate, max-age=0"),
    ("pragma", "no-cache"),
    ("expires", "0"),
    ("access-control-allow-origin", "*"),
];

/// Insert the policy headers, replacing any value a builder may have set.
///
/// `insert` (not `append`) keeps each header present exactly once.
pub fn apply_no_cache_policy(headers: &mut HeaderMap) {
    for (name, value) in NO_CACHE_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

/// Attach the `Server` header, skipping names that are not valid header values
pub fn apply_server_name(headers: &mut HeaderMap, server_name: &str) {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{CACHE_CONTROL, PRAGMA};

    #[test]
    fn test_policy_values_exact() {
        let mut headers = HeaderMap::new();
        apply_no_cache_policy(&mut headers);

        assert_eq!(headers.len(), 4);
        assert_eq!(
            headers["cache-control"],
            "no-store, no-cache, must-revalidate, max-age=0"
        );
        assert_eq!(headers["pragma"], "no-cache");
        assert_eq!(headers["expires"], "0");
        assert_eq!(headers["access-control-allow-origin"], "*");
    }

    #[test]
    fn test_policy_replaces_existing_values() {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600"));
        headers.append(PRAGMA, HeaderValue::from_static("cache"));
        headers.append(PRAGMA, HeaderValue::from_static("more-cache"));

        apply_no_cache_policy(&mut headers);

        for (name, value) in NO_CACHE_HEADERS {
            let values: Vec<_> = headers.get_all(name).iter().collect();
            assert_eq!(values, vec![value], "header {name}");
        }
    }

    #[test]
    fn test_policy_is_idempotent() {
        let mut headers = HeaderMap::new();
        apply_no_cache_policy(&mut headers);
        apply_no_cache_policy(&mut headers);
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_server_name() {
        let mut headers = HeaderMap::new();
        apply_server_name(&mut headers, "nocache-serve/0.1.0");
        assert_eq!(headers[SERVER], "nocache-serve/0.1.0");

        let mut headers = HeaderMap::new();
        apply_server_name(&mut headers, "bad\nname");
        assert!(headers.get(SERVER).is_none());
    }
}
