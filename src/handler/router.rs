//! Request dispatch module
//!
//! Entry point for HTTP request processing: method check, default-document
//! rewrite, file serving, then the response header policy.

use crate::config::AppState;
use crate::handler::{resolve, static_files};
use crate::http::{self, headers, ResponseBody};
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Request path after the default-document rewrite, still percent-encoded
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible> {
    let (parts, body) = req.into_parts();
    drop(body);

    let mut response = dispatch(&parts, &state).await;

    // Header policy covers every status, success or not
    http::apply_no_cache_policy(response.headers_mut());
    headers::apply_server_name(response.headers_mut(), &state.config.http.server_name);

    Ok(response)
}

async fn dispatch(req: &Parts, state: &AppState) -> Response<ResponseBody> {
    let method = &req.method;
    if *method != Method::GET && *method != Method::HEAD {
        return http::build_error_response(
            StatusCode::NOT_IMPLEMENTED,
            &format!("Unsupported method ('{method}')"),
        );
    }

    let uri = &req.uri;
    let ctx = RequestContext {
        path: resolve::rewrite_default_document(uri.path()),
        query: uri.query(),
        is_head: *method == Method::HEAD,
        if_modified_since: req
            .headers
            .get(IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        has_if_none_match: req.headers.contains_key(IF_NONE_MATCH),
    };

    static_files::serve(&ctx, state).await
}
