//! nocache-serve
//!
//! A local static file server for previewing sites during development.
//! Every response disables client and proxy caching and allows cross-origin reads.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::ServerError;
