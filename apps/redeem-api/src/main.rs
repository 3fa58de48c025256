//! PDFMate redemption server

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use redeem_api::config::{parse_code_list, Config};
use redeem_api::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::parse();

    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(log_level.into())
                .add_directive("tower_http=debug".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Initializing redemption API...");
    let state = AppState::connect(&config.database_url()).await?;

    if let Some(path) = &config.import_codes {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading code list {}", path.display()))?;
        let codes = parse_code_list(&text);
        let inserted = state.store.provision(&codes).await?;
        info!(
            "Provisioned {} new codes ({} listed) from {}",
            inserted,
            codes.len(),
            path.display()
        );
    }

    let app = router(Arc::new(state));

    let addr = config.addr();
    info!("Starting redemption API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
