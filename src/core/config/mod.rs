//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. `SPEDIT_API_BASE_URL` environment variable (base URL only)
//! 4. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$SPEDIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/spedit/config.toml`
//! 3. `~/.spedit/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use spedit::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("API: {}", config.api_base_url());
//! println!("Autosave after {:?}", config.autosave_delay());
//! ```

pub mod schema;

pub use schema::{ApiConfig, DraftsConfig, FileConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::paths::SpeditPaths;
use schema::{DEFAULT_API_BASE_URL, DEFAULT_AUTOSAVE_DELAY_MS, DEFAULT_REFRESH_PATH};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SPEDIT_CONFIG";

/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV: &str = "SPEDIT_API_BASE_URL";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Resolved configuration.
///
/// Accessors apply defaults, so callers never see `Option`s for settings
/// that always have a value.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed config file contents
    pub file: FileConfig,
    /// Base URL from the environment, if set
    base_url_override: Option<String>,
    /// Path the file config was loaded from
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed, or if
    /// any value (including the environment override) is invalid. A missing
    /// config file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match Self::locate() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file = Self::parse(path, &contents)?;
        Ok(Self {
            file,
            base_url_override: None,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// Parse and validate config file contents.
    fn parse(path: &Path, contents: &str) -> Result<FileConfig, ConfigError> {
        let file: FileConfig = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;
        Ok(file)
    }

    /// Apply a base URL override (normally from `SPEDIT_API_BASE_URL`).
    ///
    /// Empty values are ignored.
    pub fn with_base_url_override(mut self, url: Option<String>) -> Result<Self, ConfigError> {
        match url.filter(|u| !u.is_empty()) {
            Some(url) => {
                schema::validate_base_url(&url)?;
                self.base_url_override = Some(url);
            }
            None => self.base_url_override = None,
        }
        Ok(self)
    }

    /// Find the first existing config file.
    fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("spedit/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        SpeditPaths::from_home()
            .map(|paths| paths.config_path())
            .filter(|path| path.exists())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Base URL requests are issued against.
    pub fn api_base_url(&self) -> &str {
        self.base_url_override
            .as_deref()
            .or_else(|| self.file.api.as_ref().and_then(|a| a.base_url.as_deref()))
            .unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Path of the credential refresh endpoint.
    pub fn refresh_path(&self) -> &str {
        self.file
            .api
            .as_ref()
            .and_then(|a| a.refresh_path.as_deref())
            .unwrap_or(DEFAULT_REFRESH_PATH)
    }

    /// Inactivity delay before a draft snapshot is persisted.
    pub fn autosave_delay(&self) -> Duration {
        let ms = self
            .file
            .drafts
            .as_ref()
            .and_then(|d| d.autosave_delay_ms)
            .unwrap_or(DEFAULT_AUTOSAVE_DELAY_MS);
        Duration::from_millis(ms)
    }

    /// Directory of the durable key-value store.
    pub fn store_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = self.file.drafts.as_ref().and_then(|d| d.store_dir.as_ref()) {
            return Ok(PathBuf::from(dir));
        }
        SpeditPaths::from_home()
            .map(|paths| paths.store_dir())
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Path of the config file that was loaded, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}
