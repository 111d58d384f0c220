//! cli::commands::auth
//!
//! Store, inspect and remove the session credentials.
//!
//! # Design
//!
//! - Tokens are stored through [`PersistedSession`]
//! - Tokens are NEVER printed to stdout/stderr
//!
//! # Example
//!
//! ```bash
//! spedit auth login --access-token <token> --refresh-token <token>
//! spedit auth status
//! spedit auth logout
//! ```

use anyhow::{Context as _, Result};

use crate::auth::{Credentials, PersistedSession};
use crate::cli::Context;

fn persisted(ctx: &Context) -> Result<PersistedSession> {
    Ok(PersistedSession::new(ctx.store()?))
}

/// Store a token pair.
pub fn login(ctx: &Context, access_token: &str, refresh_token: &str) -> Result<()> {
    persisted(ctx)?
        .save(&Credentials::new(access_token, refresh_token))
        .context("Failed to store credentials")?;
    if !ctx.quiet {
        println!("Credentials stored.");
    }
    Ok(())
}

/// Report whether credentials are stored.
pub fn status(ctx: &Context) -> Result<()> {
    let stored = persisted(ctx)?
        .load()
        .context("Failed to read stored credentials")?;
    match stored {
        Some(_) => println!("Authenticated."),
        None => println!("Not authenticated. Run 'spedit auth login'."),
    }
    Ok(())
}

/// Remove stored credentials.
pub fn logout(ctx: &Context) -> Result<()> {
    persisted(ctx)?
        .remove()
        .context("Failed to remove stored credentials")?;
    if !ctx.quiet {
        println!("Logged out.");
    }
    Ok(())
}
