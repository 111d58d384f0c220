//! auth::credentials
//!
//! The access/refresh token pair.
//!
//! # Security
//!
//! Tokens must never appear in logs, error messages or debug output, so
//! [`Credentials`] implements a redacting `Debug`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An access token and the refresh token that renews it.
///
/// Serializes as `{"accessToken": ..., "refreshToken": ...}`, the shape the
/// refresh endpoint returns.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}
