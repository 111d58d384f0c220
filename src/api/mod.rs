//! api
//!
//! Authenticated REST client for the config server.
//!
//! # Architecture
//!
//! - [`ApiClient`]: `get`/`post`/`put`/`delete` routed through one `send`
//!   that attaches the bearer token, refreshes on 401 and retries once
//! - `refresh`: the single-flight coordinator shared by clones of a client
//! - `queries`: typed endpoint helpers (`list_patterns`, `assembled_config`,
//!   `feed_episodes`, `preview`)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use spedit::api::ApiClient;
//! use spedit::auth::{Credentials, Session};
//!
//! let session = Arc::new(Session::with_credentials(Credentials::new(access, refresh)));
//! let client = ApiClient::new("http://localhost:8080", session);
//!
//! for pattern in client.list_patterns().await? {
//!     println!("{} ({} playlists)", pattern.id, pattern.playlist_count);
//! }
//! ```

mod client;
mod errors;
mod queries;
mod refresh;
mod types;

pub use client::ApiClient;
pub use errors::{ApiError, RefreshFailure};
pub use queries::PATTERNS_PATH;
pub use types::{FeedEpisode, PatternSummary, PreviewRequest};
