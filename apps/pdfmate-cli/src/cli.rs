//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Endpoint used when neither `--endpoint` nor `PDFMATE_ENDPOINT` is set
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3001";

#[derive(Parser, Debug)]
#[command(name = "pdfmate")]
#[command(version, about = "Merge and split PDFs locally")]
pub struct Cli {
    /// File holding the local license and usage counter
    #[arg(long, env = "PDFMATE_STATE", global = true)]
    pub state: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Combine PDFs into one document, in the order given
    Merge {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract a page range, or every page into a zip archive
    Split {
        file: PathBuf,

        /// Pages to keep, e.g. "1-3, 5" or "10-1"
        #[arg(long, required_unless_present = "all", conflicts_with = "all")]
        pages: Option<String>,

        /// Write each page to its own PDF inside a zip archive
        #[arg(long)]
        all: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show page count and metadata
    Pages { file: PathBuf },

    /// Preview a page selection for a document of `total` pages
    Select {
        total: u32,

        #[arg(long)]
        range: Option<String>,

        /// Page number (1-based) to flip in or out of the selection
        #[arg(long)]
        toggle: Vec<u32>,
    },

    /// Redeem an activation code and store the license locally
    Activate {
        code: String,

        #[arg(long, env = "PDFMATE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },

    /// Show license and usage
    Status,

    /// Remove the local license
    Deactivate,

    /// Generate activation codes for provisioning
    GenerateCodes {
        #[arg(short, long, default_value_t = 10)]
        count: usize,

        /// Write an INSERT statement for the licenses table
        #[arg(long)]
        sql: Option<PathBuf>,

        /// Write the plain code list, one per line
        #[arg(long)]
        list: Option<PathBuf>,
    },
}
