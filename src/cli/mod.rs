//! cli
//!
//! Command-line interface for spedit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers read files and flags, call into
//! [`crate::merge`], [`crate::drafts`], [`crate::editor`], [`crate::auth`]
//! and [`crate::api`], and format the results.

pub mod args;
pub mod commands;

pub use args::Cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::{Config, BASE_URL_ENV};
use crate::storage::{self, FileKvStore, KvStore};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SPEDIT_LOG";

/// Settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Explicit config file (`--config`)
    pub config_path: Option<PathBuf>,
    /// Explicit store directory (`--store-dir`)
    pub store_dir: Option<PathBuf>,
    pub debug: bool,
    pub quiet: bool,
}

impl Context {
    /// Load configuration from `--config`, or the default locations.
    pub fn load_config(&self) -> Result<Config> {
        let config = match &self.config_path {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
                .with_base_url_override(std::env::var(BASE_URL_ENV).ok())?,
            None => Config::load().context("Failed to load config")?,
        };
        Ok(config)
    }

    /// Open the store named by `--store-dir`, or the configured one.
    pub fn store(&self) -> Result<Arc<dyn KvStore>> {
        if let Some(dir) = &self.store_dir {
            return Ok(Arc::new(FileKvStore::new(dir)));
        }
        let config = self.load_config()?;
        storage::open_store(&config).context("Failed to open store")
    }
}

/// Install the stderr log subscriber.
///
/// `SPEDIT_LOG` sets the filter (default `warn`); `--debug` forces `debug`.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let ctx = Context {
        config_path: cli.config.clone(),
        store_dir: cli.store_dir.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
