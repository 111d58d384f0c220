//! cli::commands::draft
//!
//! Inspect and manage stored drafts.
//!
//! # Example
//!
//! ```bash
//! # What is stored?
//! spedit draft list
//!
//! # Store a draft, then restore it onto a newer server version
//! spedit draft save p1 --base synced.json --modified mine.json
//! spedit draft restore p1 --server server.json
//!
//! # Drafts of never-saved entities use the __new__ id
//! spedit draft show __new__
//! ```

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use chrono::SecondsFormat;

use super::{print_json, read_json};
use crate::cli::Context;
use crate::drafts::{DraftKey, DraftService};
use crate::editor::{EditorSession, RequireObject};

fn service(ctx: &Context) -> Result<DraftService> {
    Ok(DraftService::new(ctx.store()?))
}

/// List stored drafts, one per line: id and save time.
pub fn list(ctx: &Context) -> Result<()> {
    let drafts = service(ctx)?
        .list_drafts()
        .context("Failed to list drafts")?;

    if drafts.is_empty() {
        if !ctx.quiet {
            println!("No drafts stored.");
        }
        return Ok(());
    }
    for (key, entry) in drafts {
        println!(
            "{}\t{}",
            key,
            entry.saved_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }
    Ok(())
}

/// Print a stored draft as JSON.
pub fn show(ctx: &Context, id: &str) -> Result<()> {
    let key = DraftKey::parse(id);
    match service(ctx)?.load_draft(&key) {
        Some(entry) => print_json(&serde_json::to_value(&entry)?, false),
        None => bail!("No draft stored for '{}'", key),
    }
}

/// Remove a stored draft.
pub fn clear(ctx: &Context, id: &str) -> Result<()> {
    let key = DraftKey::parse(id);
    service(ctx)?
        .clear_draft(&key)
        .with_context(|| format!("Failed to clear draft for '{}'", key))?;
    if !ctx.quiet {
        println!("Cleared draft for '{}'", key);
    }
    Ok(())
}

/// Store a draft from two JSON files.
pub fn save(ctx: &Context, id: &str, base: &Path, modified: &Path) -> Result<()> {
    let key = DraftKey::parse(id);
    let base = read_json(base)?;
    let modified = read_json(modified)?;
    service(ctx)?
        .save_draft(&key, &base, &modified)
        .with_context(|| format!("Failed to save draft for '{}'", key))?;
    if !ctx.quiet {
        println!("Saved draft for '{}'", key);
    }
    Ok(())
}

/// Restore a draft and print the result.
///
/// With `--server` the draft is merged onto that version. The result must
/// be a mapping; otherwise the draft is kept and the command fails.
pub fn restore(ctx: &Context, id: &str, server: Option<&Path>) -> Result<()> {
    let key = DraftKey::parse(id);
    let server = server.map(read_json).transpose()?;
    let drafts = service(ctx)?;

    let mut session = EditorSession::open(key.clone(), server, drafts, RequireObject);
    if session.pending_draft().is_none() {
        bail!("No draft stored for '{}'", key);
    }
    let restored = session
        .restore_draft()
        .with_context(|| format!("Failed to restore draft for '{}'", key))?;
    print_json(restored, false)
}
