//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Reads its input files and flags
//! 2. Calls into the library
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Commands that talk to the server (`patterns`, `fetch`) are async
//! because they involve network I/O. Their handlers build a Tokio runtime
//! and block on the async implementation.

mod auth;
mod config_cmd;
mod draft;
mod fetch;
mod merge;
mod patterns;

// Re-export command functions for testing and direct invocation
pub use auth::{login, logout, status};
pub use config_cmd::show as config_show;
pub use fetch::fetch;
pub use merge::merge;
pub use patterns::patterns;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use serde_json::Value;

use crate::api::ApiClient;
use crate::auth::{PersistedSession, Session};
use crate::cli::args::{AuthAction, Command, ConfigAction, DraftAction};
use crate::cli::Context;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Merge {
            base,
            latest,
            modified,
            compact,
        } => merge::merge(&base, &latest, &modified, compact),
        Command::Draft { action } => match action {
            DraftAction::List => draft::list(ctx),
            DraftAction::Show { id } => draft::show(ctx, &id),
            DraftAction::Clear { id } => draft::clear(ctx, &id),
            DraftAction::Save { id, base, modified } => draft::save(ctx, &id, &base, &modified),
            DraftAction::Restore { id, server } => draft::restore(ctx, &id, server.as_deref()),
        },
        Command::Auth { action } => match action {
            AuthAction::Login {
                access_token,
                refresh_token,
            } => auth::login(ctx, &access_token, &refresh_token),
            AuthAction::Status => auth::status(ctx),
            AuthAction::Logout => auth::logout(ctx),
        },
        Command::Patterns => patterns::patterns(ctx),
        Command::Fetch { id } => fetch::fetch(ctx, &id),
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
        },
    }
}

/// Read and parse a JSON file.
pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Print a JSON value to stdout.
pub(crate) fn print_json(value: &Value, compact: bool) -> Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", out);
    Ok(())
}

/// Client with the stored session restored and mirrored on refresh.
pub(crate) fn api_client(ctx: &Context) -> Result<ApiClient> {
    let config = ctx.load_config()?;
    let store = ctx.store()?;
    let persisted = Arc::new(PersistedSession::new(store));
    let session = Arc::new(Session::new());
    persisted
        .attach(&session)
        .context("Failed to read stored credentials")?;
    Ok(ApiClient::from_config(&config, session))
}
