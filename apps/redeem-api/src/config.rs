//! Server configuration from flags, environment and `.env`

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::state::default_database_url;

#[derive(Parser, Debug, Clone)]
#[command(name = "redeem-api")]
#[command(version, about = "PDFMate license redemption endpoint")]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// SQLite connection string; defaults to a file in the data directory
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Provision the codes listed in this file (one per line) at startup
    #[arg(long)]
    pub import_codes: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(default_database_url)
    }
}

/// Codes from a provisioning list: one per line, blanks and `#` comments skipped
pub fn parse_code_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
