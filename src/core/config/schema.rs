//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing so that a bad base URL or a
//! zero autosave delay is reported at load time rather than on first use.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Default path of the credential refresh endpoint.
pub const DEFAULT_REFRESH_PATH: &str = "/api/auth/refresh";

/// Default autosave debounce in milliseconds.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;

/// Global configuration file.
///
/// # Example
///
/// ```toml
/// [api]
/// base_url = "https://playlists.example.com"
/// refresh_path = "/api/auth/refresh"
///
/// [drafts]
/// autosave_delay_ms = 2000
/// store_dir = "/var/lib/spedit/store"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Server connection settings
    pub api: Option<ApiConfig>,

    /// Draft persistence settings
    pub drafts: Option<DraftsConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(api) = &self.api {
            api.validate()?;
        }
        if let Some(drafts) = &self.drafts {
            drafts.validate()?;
        }
        Ok(())
    }
}

/// `[api]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL requests are issued against
    pub base_url: Option<String>,

    /// Path of the refresh endpoint, relative to the base URL
    pub refresh_path: Option<String>,
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.base_url {
            validate_base_url(url)?;
        }
        if let Some(path) = &self.refresh_path {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidValue(format!(
                    "refresh_path '{}' must start with '/'",
                    path
                )));
            }
        }
        Ok(())
    }
}

/// `[drafts]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DraftsConfig {
    /// Inactivity delay before a draft snapshot is persisted
    pub autosave_delay_ms: Option<u64>,

    /// Directory of the durable key-value store
    pub store_dir: Option<String>,
}

impl DraftsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autosave_delay_ms == Some(0) {
            return Err(ConfigError::InvalidValue(
                "autosave_delay_ms must be greater than zero".into(),
            ));
        }
        if self.store_dir.as_deref() == Some("") {
            return Err(ConfigError::InvalidValue(
                "store_dir cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Check that a base URL is an http(s) URL.
pub fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "base_url '{}' must start with http:// or https://",
            url
        )))
    }
}
