use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod bot;
mod commands;
mod config;
mod db;
mod ocr;
mod server;

use config::Config;
use db::Ledger;
use ocr::{TesseractOcr, TextExtractor};
use server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // Open the score ledger
    let ledger = Ledger::open(&config.database_path)?;
    info!("Score ledger opened: {}", config.database_path);

    let ocr: Arc<dyn TextExtractor> =
        Arc::new(TesseractOcr::new(&config.tesseract_cmd, &config.ocr_lang));
    info!(
        "OCR engine: {} (language pack: {})",
        config.tesseract_cmd, config.ocr_lang
    );

    // Shared client for attachment downloads
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let state = AppState {
        ledger,
        ocr,
        http,
        started_at: Utc::now(),
    };
    let app = server::router(state);
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Chat endpoint and dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve until shutdown
    axum::serve(listener, app).await?;

    Ok(())
}
