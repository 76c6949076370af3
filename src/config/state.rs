// Application state module
// Read-only state shared by every connection task

use std::path::PathBuf;

use super::types::Config;
use crate::error::ServerError;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical serving root
    pub root: PathBuf,
}

impl AppState {
    /// Resolve the serving root once so every request joins onto the same absolute path
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let root = config
            .server
            .root
            .canonicalize()
            .map_err(|source| ServerError::Root {
                path: config.server.root.clone(),
                source,
            })?;

        if !root.is_dir() {
            return Err(ServerError::Root {
                path: config.server.root.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "not a directory",
                ),
            });
        }

        Ok(Self { config, root })
    }
}
