//! Server configuration.
//!
//! Built once at startup from (in increasing precedence) defaults, an
//! optional YAML file, and command-line flags, then shared read-only.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::server::listener::AddressFamily;

pub const DEFAULT_PORT: u16 = 5555;
pub const DEFAULT_WORKERS: usize = 100;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Command-line flags. Every flag overrides the config file.
#[derive(Debug, Default, Parser)]
#[command(name = "searchd", about = "Static file and search server")]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "LISTEN_PORT")]
    pub port: Option<u16>,

    /// Directory served under /static/
    #[arg(short, long)]
    pub static_dir: Option<PathBuf>,

    /// Directory of documents to index (repeatable)
    #[arg(short, long = "index")]
    pub indices: Vec<PathBuf>,

    /// Number of worker tasks
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Accepted connections that may wait for a worker
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Address family to listen on
    #[arg(long, value_enum)]
    pub family: Option<AddressFamily>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub port: u16,
    pub static_dir: PathBuf,
    pub indices: Vec<PathBuf>,
    pub workers: usize,
    pub queue_capacity: usize,
    pub family: AddressFamily,
    /// Resolve peer and local DNS names on accept
    pub reverse_dns: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("."),
            indices: Vec::new(),
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            family: AddressFamily::default(),
            reverse_dns: true,
        }
    }
}

impl Config {
    /// Builds the configuration from parsed flags and validates it.
    pub fn load(cli: Cli) -> Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(port) = cli.port {
            cfg.port = port;
        }
        if let Some(dir) = cli.static_dir {
            cfg.static_dir = dir;
        }
        if !cli.indices.is_empty() {
            cfg.indices = cli.indices;
        }
        if let Some(workers) = cli.workers {
            cfg.workers = workers;
        }
        if let Some(capacity) = cli.queue_capacity {
            cfg.queue_capacity = capacity;
        }
        if let Some(family) = cli.family {
            cfg.family = family;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            anyhow::bail!("workers must be at least 1");
        }
        if self.queue_capacity == 0 {
            anyhow::bail!("queue_capacity must be at least 1");
        }
        if !self.static_dir.is_dir() {
            anyhow::bail!(
                "static directory {} does not exist",
                self.static_dir.display()
            );
        }
        Ok(())
    }
}
