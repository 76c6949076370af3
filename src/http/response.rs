//! HTTP response building module
//!
//! Builders for every response the file server produces. The no-cache policy is
//! applied afterwards by the handler, so builders never set caching headers.
//! The one exception is `encode_raw_error`, whose bytes bypass the handler.

use hyper::header::{
    HeaderMap, HeaderValue, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, DATE, LAST_MODIFIED,
    LOCATION,
};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use std::time::SystemTime;

use super::body::{self, ResponseBody};
use super::cache::format_http_date;
use super::headers::{apply_no_cache_policy, apply_server_name};

/// Build 200 response for a regular file
///
/// `content_length` is the file size; for `HEAD` the body is empty but the length is kept.
pub fn build_file_response(
    body: ResponseBody,
    content_type: &str,
    content_length: u64,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<ResponseBody> {
    let body = if is_head { body::empty() } else { body };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);
    if let Some(last_modified) = last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    finish(builder, StatusCode::OK, body)
}

/// Build 200 response for a generated directory listing
pub fn build_listing_response(html: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = html.len();
    let body = if is_head {
        body::empty()
    } else {
        body::full(html)
    };

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length);

    finish(builder, StatusCode::OK, body)
}

/// Build 301 redirect, used to add the trailing slash to directory paths
pub fn build_301_response(location: &str) -> Response<ResponseBody> {
    let builder = Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0);

    finish(builder, StatusCode::MOVED_PERMANENTLY, body::empty())
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<ResponseBody> {
    let builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(LAST_MODIFIED, last_modified);

    finish(builder, StatusCode::NOT_MODIFIED, body::empty())
}

/// Build an error response with a short plain-text body, e.g. `404 File not found`
pub fn build_error_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
    let text = format!("{} {message}", status.as_u16());

    let builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_LENGTH, text.len());

    finish(builder, status, body::full(text))
}

/// Raw HTTP/1.1 bytes of an error response for a request that never reached
/// the handler, such as a request head that does not parse.
///
/// Carries the policy headers and `Connection: close`; header names are title-cased
/// the same way hyper writes them.
pub fn encode_raw_error(status: StatusCode, server_name: &str) -> Vec<u8> {
    let reason = status.canonical_reason().unwrap_or_default();
    let text = format!("{} {reason}", status.as_u16());

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(CONTENT_LENGTH, HeaderValue::from(text.len()));
    headers.insert(CONNECTION, HeaderValue::from_static("close"));
    if let Ok(date) = HeaderValue::from_str(&format_http_date(SystemTime::now())) {
        headers.insert(DATE, date);
    }
    apply_no_cache_policy(&mut headers);
    apply_server_name(&mut headers, server_name);

    let mut out = format!("HTTP/1.1 {} {reason}\r\n", status.as_str()).into_bytes();
    for (name, value) in &headers {
        out.extend_from_slice(title_case(name.as_str()).as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(text.as_bytes());
    out
}

/// `cache-control` -> `Cache-Control`
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        out.push(if upper { c.to_ascii_uppercase() } else { c });
        upper = c == '-';
    }
    out
}

/// Attach the body, falling back to a bare response if a header value was invalid
fn finish(builder: Builder, status: StatusCode, body: ResponseBody) -> Response<ResponseBody> {
    builder.body(body).unwrap_or_else(|e| {
        crate::logger::log_error(&format!("Failed to build {status} response: {e}"));
        let mut fallback = Response::new(body::empty());
        *fallback.status_mut() = status;
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::body::Bytes;

    async fn body_bytes(response: Response<ResponseBody>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_file_response() {
        let resp = build_file_response(
            body::full("body{}"),
            "text/css",
            6,
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
            false,
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/css");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "6");
        assert_eq!(
            resp.headers()[LAST_MODIFIED],
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
        assert_eq!(body_bytes(resp).await, "body{}");
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = build_file_response(body::full("ignored"), "text/html", 512, None, true);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "512");
        assert!(resp.headers().get(LAST_MODIFIED).is_none());
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_error_response() {
        let resp = build_error_response(StatusCode::NOT_FOUND, "File not found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "18");
        assert_eq!(body_bytes(resp).await, "404 File not found");
    }

    #[test]
    fn test_redirect_response() {
        let resp = build_301_response("/docs/");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/docs/");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "0");
    }

    #[test]
    fn test_invalid_header_falls_back_with_status() {
        let resp = build_301_response("/bad\nlocation");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert!(resp.headers().get(LOCATION).is_none());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("cache-control"), "Cache-Control");
        assert_eq!(title_case("access-control-allow-origin"), "Access-Control-Allow-Origin");
        assert_eq!(title_case("expires"), "Expires");
    }

    #[test]
    fn test_raw_error_carries_policy() {
        let raw = String::from_utf8(encode_raw_error(StatusCode::BAD_REQUEST, "nocache-serve/test"))
            .unwrap();
        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        let mut lines = head.split("\r\n");

        assert_eq!(lines.next(), Some("HTTP/1.1 400 Bad Request"));
        let lines: Vec<&str> = lines.collect();
        for expected in [
            "Cache-Control: no-store, no-cache, must-revalidate, max-age=0",
            "Pragma: no-cache",
            "Expires: 0",
            "Access-Control-Allow-Origin: *",
            "Connection: close",
            "Content-Length: 15",
            "Server: nocache-serve/test",
        ] {
            let count = lines.iter().filter(|l| **l == expected).count();
            assert_eq!(count, 1, "{expected} in {lines:?}");
        }
        assert_eq!(body, "400 Bad Request");
    }
}
