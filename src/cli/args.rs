//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file
//! - `--store-dir <dir>`: Use this draft/session store
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// spedit - drafts, three-way merge and sync for smart playlist configs
#[derive(Parser, Debug)]
#[command(name = "spedit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Store directory to use instead of the configured one
    #[arg(long, global = true, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Three-way merge of JSON files
    #[command(
        name = "merge",
        long_about = "Three-way merge of JSON files.\n\n\
            Combines the changes from BASE to MODIFIED (your edits) with the changes \
            from BASE to LATEST (the server's). Where both changed the same value, \
            your edit wins. Lists whose elements all carry an \"id\" are matched by id; \
            other lists are merged position by position.",
        after_help = "\
EXAMPLES:
    # Rebase a local draft onto the current server version
    spedit merge --base synced.json --latest server.json --modified mine.json"
    )]
    Merge {
        /// Common ancestor (last synced state)
        #[arg(long, value_name = "FILE")]
        base: PathBuf,

        /// Current server state
        #[arg(long, value_name = "FILE")]
        latest: PathBuf,

        /// Locally edited state
        #[arg(long, value_name = "FILE")]
        modified: PathBuf,

        /// Print on one line
        #[arg(long)]
        compact: bool,
    },

    /// Inspect and manage stored drafts
    #[command(
        name = "draft",
        after_help = "\
Use the id __new__ for the draft of an entity that was never saved."
    )]
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Manage stored credentials
    #[command(name = "auth")]
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// List patterns on the server
    #[command(name = "patterns")]
    Patterns,

    /// Print the assembled config of a pattern
    #[command(name = "fetch")]
    Fetch {
        /// Pattern id
        id: String,
    },

    /// Show configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Draft subcommands.
#[derive(Subcommand, Debug)]
pub enum DraftAction {
    /// List stored drafts
    List,

    /// Print a stored draft
    Show {
        /// Entity id, or __new__
        id: String,
    },

    /// Remove a stored draft
    Clear {
        /// Entity id, or __new__
        id: String,
    },

    /// Store a draft from files
    Save {
        /// Entity id, or __new__
        id: String,

        /// State the edits started from
        #[arg(long, value_name = "FILE")]
        base: PathBuf,

        /// Edited state
        #[arg(long, value_name = "FILE")]
        modified: PathBuf,
    },

    /// Restore a draft, merged onto the server version when given
    Restore {
        /// Entity id, or __new__
        id: String,

        /// Current server version to merge onto
        #[arg(long, value_name = "FILE")]
        server: Option<PathBuf>,
    },
}

/// Auth subcommands.
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Store a token pair
    Login {
        #[arg(long, value_name = "TOKEN")]
        access_token: String,

        #[arg(long, value_name = "TOKEN")]
        refresh_token: String,
    },

    /// Show whether credentials are stored
    Status,

    /// Remove stored credentials
    Logout,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
}
