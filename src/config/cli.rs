// Command-line flags
// Every flag is optional; unset flags fall through to env, file and defaults

use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Serve the current directory with caching disabled and CORS allowed
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "nocache-serve", version, about)]
pub struct Cli {
    /// Port to listen on [default: 8000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(short, long, value_name = "ADDRESS")]
    pub bind: Option<String>,

    /// Directory to serve [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Config file (TOML, YAML or JSON) [default: ./nocache.toml if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Tokio worker threads, at least 1 [default: one per CPU core]
    #[arg(short, long)]
    pub workers: Option<NonZeroUsize>,
}
