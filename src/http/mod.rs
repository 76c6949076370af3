//! HTTP protocol layer module
//!
//! Header policy, MIME detection, conditional request handling, response bodies
//! and response builders.
//! Decoupled from filesystem lookup, which lives in `handler`.

pub mod body;
pub mod cache;
pub mod headers;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use body::{FileBody, ResponseBody};
pub use headers::apply_no_cache_policy;
pub use response::{
    build_301_response, build_304_response, build_error_response, build_file_response,
    build_listing_response, encode_raw_error,
};
