// Configuration module entry point
// Layers built-in defaults, an optional config file, environment variables and CLI flags

mod cli;
mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

pub use cli::Cli;
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig};

use crate::error::ServerError;

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "nocache";

/// Environment variable prefix, e.g. `NOCACHE_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "NOCACHE";

pub const DEFAULT_PORT: u16 = 8000;

impl Config {
    /// Load configuration, lowest to highest precedence:
    /// defaults, config file, `NOCACHE_*` environment, command-line flags.
    pub fn load(cli: &Cli) -> Result<Self, ServerError> {
        let file = match cli.config.as_deref() {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.root", ".")?
            .set_default("server.keep_alive", true)?
            .set_default(
                "http.server_name",
                concat!("nocache-serve/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_default("logging.level", "info")?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", cli.port.map(i64::from))?
            .set_override_option("server.host", cli.bind.clone())?
            .set_override_option(
                "server.root",
                cli.directory
                    .as_ref()
                    .map(|d| d.to_string_lossy().into_owned()),
            )?
            .set_override_option(
                "server.workers",
                cli.workers.and_then(|w| i64::try_from(w.get()).ok()),
            )?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Listen address; `host` must be an IPv4 or IPv6 literal
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ServerError::InvalidAddress(self.server.host.clone()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
