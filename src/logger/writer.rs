//! Log writer module
//!
//! Provides thread-safe log writing to files or stdout/stderr.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use super::format::Level;

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

/// Thread-safe log writer
pub struct LogWriter {
    level: Level,
    /// Info and debug lines
    info: LogTarget,
    /// Warning and error lines
    error: LogTarget,
}

impl LogWriter {
    fn new(level: Level, info_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        let info = match info_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self { level, info, error })
    }

    pub const fn level(&self) -> Level {
        self.level
    }

    pub fn write(&self, level: Level, line: &str) {
        if level.is_error_stream() {
            write_to_target(&self.error, line);
        } else {
            write_to_target(&self.info, line);
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write message to log target
fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => println!("{message}"),
        LogTarget::Stderr => eprintln!("{message}"),
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(level: Level, info_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(level, info_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, `None` before `init()`
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_targets_split_by_level() {
        let dir = std::env::temp_dir().join(format!("nocache-logs-{}", std::process::id()));
        let info_path = dir.join("nested/info.log");
        let error_path = dir.join("error.log");
        let _ = std::fs::remove_file(&info_path);
        let _ = std::fs::remove_file(&error_path);

        let writer = LogWriter::new(
            Level::Debug,
            info_path.to_str(),
            error_path.to_str(),
        )
        .unwrap();
        writer.write(Level::Info, "started");
        writer.write(Level::Debug, "details");
        writer.write(Level::Error, "broken");

        let info = std::fs::read_to_string(&info_path).unwrap();
        let error = std::fs::read_to_string(&error_path).unwrap();
        assert_eq!(info, "started\ndetails\n");
        assert_eq!(error, "broken\n");
        assert_eq!(writer.level(), Level::Debug);
    }
}
