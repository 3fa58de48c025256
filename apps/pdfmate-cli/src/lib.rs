//! PDFMate command-line interface
//!
//! Merges and splits PDFs on the local machine, gating large jobs behind a
//! license redeemed from the activation server.

pub mod cli;
pub mod commands;

#[cfg(test)]
pub(crate) mod test_pdf;

use std::path::PathBuf;

use anyhow::Result;
use pdfmate_license::{FileKeyValueStore, RedemptionClient};

pub use cli::{Cli, Command};
pub use commands::Session;

/// File used for local state when `--state` and `PDFMATE_STATE` are unset
pub fn default_state_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pdfmate")
        .join("state.json")
}

/// Run one parsed command and return what it printed
pub async fn run(cli: Cli) -> Result<String> {
    let state_path = cli.state.unwrap_or_else(default_state_path);
    tracing::debug!("Using local state at {}", state_path.display());
    let session = Session::new(FileKeyValueStore::new(state_path));

    match cli.command {
        Command::Merge { files, output } => session.merge(&files, output.as_deref()),
        Command::Split {
            file,
            pages,
            all,
            output,
        } => match pages {
            Some(range) if !all => session.split_range(&file, &range, output.as_deref()),
            _ => session.split_all(&file, output.as_deref()),
        },
        Command::Pages { file } => commands::pages(&file),
        Command::Select {
            total,
            range,
            toggle,
        } => commands::select(total, range.as_deref(), &toggle),
        Command::Activate { code, endpoint } => {
            session
                .activate(&RedemptionClient::new(&endpoint), &code)
                .await
        }
        Command::Status => Ok(session.status()),
        Command::Deactivate => session.deactivate(),
        Command::GenerateCodes { count, sql, list } => {
            commands::generate_codes(count, sql.as_deref(), list.as_deref())
        }
    }
}
