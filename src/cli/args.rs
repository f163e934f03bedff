//! CLI argument definitions using clap
//!
//! Commands:
//! - revstore log --config <path>
//! - revstore show --config <path> --revision <n|head>
//! - revstore verify --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::revision::RevisionNumber;

/// revstore - inspect the revision history of a document
#[derive(Parser, Debug)]
#[command(name = "revstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every revision with its metadata
    Log {
        /// Path to configuration file
        #[arg(long, default_value = "./revstore.json")]
        config: PathBuf,
    },

    /// Print one revision and the summaries of its changes
    Show {
        /// Path to configuration file
        #[arg(long, default_value = "./revstore.json")]
        config: PathBuf,

        /// Revision number, or "head" for the latest
        #[arg(long, default_value = "head")]
        revision: RevisionNumber,
    },

    /// Replay the history file and report what was read
    Verify {
        /// Path to configuration file
        #[arg(long, default_value = "./revstore.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
