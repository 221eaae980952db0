mod api_error;
mod handlers;
mod milk_log_params;
mod ocr_response;
mod routes;
mod upload;

use anyhow::{Context, Result};
use ocr_relay::{LlemmaService, RelayConfig};
use routes::AppState;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("OCR relay failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = RelayConfig::from_env()?;
    let llemma = LlemmaService::new(&config).context("failed to build Llemma client")?;
    log::info!("Relaying OCR uploads to {}", llemma.api_url());

    let state = AppState {
        llemma: Arc::new(llemma),
    };
    let app = routes::app(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
