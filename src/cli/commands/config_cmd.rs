//! config command - Show the effective configuration

use anyhow::Result;

use crate::cli::Context;

/// Print every setting with defaults applied.
pub fn show(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    match config.loaded_from() {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# No config file; using defaults"),
    }
    println!("api.base_url = {}", config.api_base_url());
    println!("api.refresh_path = {}", config.refresh_path());
    println!(
        "drafts.autosave_delay_ms = {}",
        config.autosave_delay().as_millis()
    );
    match &ctx.store_dir {
        Some(dir) => println!("drafts.store_dir = {}", dir.display()),
        None => match config.store_dir() {
            Ok(dir) => println!("drafts.store_dir = {}", dir.display()),
            Err(_) => println!("drafts.store_dir = (no home directory)"),
        },
    }
    Ok(())
}
