use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "userdb", version, about = "In-memory user record store over HTTP/JSON")]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listening address, overrides `server_addr`
    #[arg(long)]
    pub addr: Option<String>,

    /// Do not insert the bootstrap user at startup
    #[arg(long)]
    pub no_seed: bool,
}

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    /// Log level used when `RUST_LOG` is unset, default is "info"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// HTTP listening address
    #[serde(default = "default_server_addr")]
    pub server_addr: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Insert the bootstrap user after the store is built
    #[serde(default = "default_seed")]
    pub seed: bool,

    /// Log configuration
    #[serde(default)]
    pub log: LogConfig,
}

fn default_server_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_seed() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: default_server_addr(),
            request_timeout_secs: default_request_timeout_secs(),
            seed: default_seed(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Build the effective configuration: file (or defaults), then command line overrides
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(addr) = &args.addr {
            config.server_addr = addr.clone();
        }
        if args.no_seed {
            config.seed = false;
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
