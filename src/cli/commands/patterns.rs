//! cli::commands::patterns
//!
//! List the patterns known to the server.

use anyhow::{Context as _, Result};

use super::api_client;
use crate::cli::Context;

/// Run the patterns command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn patterns(ctx: &Context) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(patterns_async(ctx))
}

async fn patterns_async(ctx: &Context) -> Result<()> {
    let client = api_client(ctx)?;
    let patterns = client
        .list_patterns()
        .await
        .context("Failed to list patterns")?;

    if patterns.is_empty() {
        if !ctx.quiet {
            println!("No patterns.");
        }
        return Ok(());
    }
    for pattern in patterns {
        println!(
            "{}\t{}\t{} playlist(s)",
            pattern.id, pattern.display_name, pattern.playlist_count
        );
    }
    Ok(())
}
