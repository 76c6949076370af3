//! Log line format module
//!
//! Every line is `[<RFC 3339 local time>] [LEVEL] message`.

use chrono::{DateTime, Local, SecondsFormat};
use serde::Deserialize;
use std::fmt;

/// Log severity, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// Whether a message at `self` passes a `threshold` filter
    pub fn enabled_at(self, threshold: Self) -> bool {
        self <= threshold
    }

    /// Error and warning lines go to the error target
    pub const fn is_error_stream(self) -> bool {
        matches!(self, Self::Error | Self::Warn)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        };
        f.write_str(s)
    }
}

/// Format a single log line
pub fn format_line(time: &DateTime<Local>, level: Level, message: &str) -> String {
    format!(
        "[{}] [{level}] {message}",
        time.to_rfc3339_opts(SecondsFormat::Millis, false)
    )
}
