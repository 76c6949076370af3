//! Request handler module
//!
//! Maps request paths onto the serving root and builds file, listing, redirect
//! and error responses. The router applies the no-cache policy to all of them.

pub mod listing;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
