//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Create and inspect validated articles.
#[derive(Parser, Debug)]
#[command(name = "article_cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file; an in-memory database is used when omitted
    #[arg(long, env = "ARTICLE_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "ARTICLE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long, env = "ARTICLE_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print core linkage info
    Ping,

    /// Create an article
    Create {
        /// Article title
        title: String,
    },

    /// Replace the title of an existing article
    Rename {
        /// Article id
        id: String,
        /// New title
        title: String,
    },

    /// Print one article
    Show {
        /// Article id
        id: String,
    },

    /// List articles ordered by title
    List {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Validate a title without writing it
    Check {
        /// Candidate title
        title: String,
        /// Treat the candidate as an update of this article
        #[arg(long)]
        id: Option<String>,
    },
}
