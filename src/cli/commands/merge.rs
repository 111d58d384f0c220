//! cli::commands::merge
//!
//! Three-way merge of JSON files.
//!
//! # Example
//!
//! ```bash
//! spedit merge --base synced.json --latest server.json --modified mine.json
//! ```

use std::path::Path;

use anyhow::Result;

use super::{print_json, read_json};

/// Run the merge command.
pub fn merge(base: &Path, latest: &Path, modified: &Path, compact: bool) -> Result<()> {
    let base = read_json(base)?;
    let latest = read_json(latest)?;
    let modified = read_json(modified)?;

    let merged = crate::merge::merge(&base, &latest, &modified);
    print_json(&merged, compact)
}
