//! Startup and runtime errors
//!
//! Everything here is fatal: it ends the process with a non-zero exit code.
//! Per-request failures live in `handler::static_files::FileError` and are
//! converted into HTTP responses instead.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ServerError {
    /// The listening socket could not be bound (port in use, privileged port)
    Bind { addr: SocketAddr, source: io::Error },
    /// Configuration could not be loaded or deserialized
    Config(config::ConfigError),
    /// `server.host` is not an IP address literal
    InvalidAddress(String),
    /// Serving root is missing or inaccessible
    Root { path: PathBuf, source: io::Error },
    Io(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::InvalidAddress(addr) => write!(f, "invalid listen address '{addr}'"),
            Self::Root { path, source } => {
                write!(f, "cannot serve directory '{}': {source}", path.display())
            }
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } | Self::Root { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::InvalidAddress(_) => None,
        }
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<io::Error> for ServerError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_bind_error_message() {
        let err = ServerError::Bind {
            addr: "0.0.0.0:8000".parse().unwrap(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };
        assert_eq!(err.to_string(), "failed to bind 0.0.0.0:8000: address in use");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_address_has_no_source() {
        let err = ServerError::InvalidAddress("nowhere:80".to_string());
        assert!(err.source().is_none());
        assert!(err.to_string().contains("nowhere:80"));
    }
}
