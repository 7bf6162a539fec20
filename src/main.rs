// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Oura-Proxy API Server
//!
//! Serves merged Oura Ring sleep, SpO2 and VO2 max metrics, refreshing the
//! stored OAuth token pair as needed.

use oura_proxy::{config::Config, store::FileStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Oura-Proxy API");

    // Open the durable token store
    let store = Arc::new(FileStore::open(&config.token_store_path).await?);
    tracing::info!(path = %store.path().display(), "Token store opened");

    let state = Arc::new(AppState::new(config.clone(), store));

    if let Some(seed) = config.oura_refresh_token.as_deref() {
        state.token_manager.seed_refresh_token(seed).await?;
    }

    // Build router
    let app = oura_proxy::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("oura_proxy=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
