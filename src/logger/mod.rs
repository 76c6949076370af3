//! Logger module
//!
//! Provides logging utilities for the server:
//! - Server lifecycle logging
//! - Error and warning logging
//! - File-based logging support
//!
//! Before `init()` is called, lines go to stdout/stderr at `info` level.

mod format;
pub mod writer;

pub use format::{format_line, Level};

use crate::config::LoggingConfig;
use chrono::Local;
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.level,
        config.info_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

fn log(level: Level, message: &str) {
    let target = writer::get();
    let threshold = target.map_or(Level::Info, writer::LogWriter::level);
    if !level.enabled_at(threshold) {
        return;
    }

    let line = format_line(&Local::now(), level, message);
    match target {
        Some(w) => w.write(level, &line),
        None if level.is_error_stream() => eprintln!("{line}"),
        None => println!("{line}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, workers: Option<usize>) {
    log(Level::Info, &format!("Listening on: http://{addr}"));
    log(Level::Info, &format!("Serving directory: {}", root.display()));
    match workers {
        Some(n) => log(Level::Info, &format!("Worker threads: {n}")),
        None => log(Level::Debug, "Worker threads: one per CPU core"),
    }
}

pub fn log_shutdown(reason: &str) {
    log(Level::Info, &format!("Shutting down ({reason})"));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    log_warning(&format!("Failed to serve connection: {err}"));
}

pub fn log_warning(message: &str) {
    log(Level::Warn, message);
}

pub fn log_error(message: &str) {
    log(Level::Error, message);
}

pub fn log_debug(message: &str) {
    log(Level::Debug, message);
}
