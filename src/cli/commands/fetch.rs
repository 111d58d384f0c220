//! cli::commands::fetch
//!
//! Print the assembled config of one pattern.

use anyhow::{Context as _, Result};

use super::{api_client, print_json};
use crate::cli::Context;

/// Run the fetch command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn fetch(ctx: &Context, id: &str) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(fetch_async(ctx, id))
}

async fn fetch_async(ctx: &Context, id: &str) -> Result<()> {
    let client = api_client(ctx)?;
    let config = client
        .assembled_config(id)
        .await
        .with_context(|| format!("Failed to fetch pattern '{}'", id))?;
    print_json(&config, false)
}
