//! nft-metadata server entry point.
//!
//! Loads configuration, opens the metadata store, and serves the HTTP routes
//! until Ctrl-C. Logs are JSON lines on stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use nftmeta_client::{ContentFetcher, FetchConfig};
use nftmeta_core::{AppConfig, open_store};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod routes;

#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let store = open_store(&config).await.context("failed to open metadata store")?;
    let fetcher = ContentFetcher::new(FetchConfig::from(&config)).context("failed to build gateway client")?;

    let app = handler::router(Arc::new(handler::AppState::new(fetcher, store)));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, gateway = %config.nft_url, "nft-metadata listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
