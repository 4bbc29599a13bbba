//! Ledger HTTP server binary.
//!
//! Reads `ledger.yaml` from the directory given with `--config`, opens an
//! in-memory ledger and serves the JSON API.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use workforce_ledger::api::{AppState, create_router};
use workforce_ledger::config::ConfigLoader;
use workforce_ledger::services::Ledger;

#[derive(Parser)]
#[command(author, version, about = "Performance and leave ledger server")]
struct Cli {
    /// Directory containing ledger.yaml.
    #[arg(short, long, default_value = "config")]
    config: PathBuf,

    /// Address to listen on.
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let config = ConfigLoader::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
    let ledger = Ledger::builder()
        .config(config)
        .open()
        .context("failed to open ledger")?;

    let app = create_router(AppState::new(ledger));

    tracing::info!("Listening on http://{}", cli.bind);
    let listener = TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
