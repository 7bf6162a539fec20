// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bootstrap the token store with an initial Oura token pair.
//!
//! Prints the authorization URL, reads the code Oura appends to the redirect
//! (or the whole redirect URL), exchanges it and writes the tokens to
//! `TOKEN_STORE_PATH`.

use anyhow::{bail, Context};
use oura_proxy::{config::Config, store::FileStore, AppState};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = Config::from_env()?;
    let client = oura_proxy::services::OuraClient::from_config(&config);

    let mut out = io::stdout().lock();
    writeln!(out, "Open this URL in your browser and authorize the app:\n")?;
    writeln!(out, "{}\n", client.authorize_url(&config.oura_redirect_uri))?;
    writeln!(
        out,
        "You will land on {} with ?code=... in the address bar.",
        config.oura_redirect_uri
    )?;
    write!(out, "Paste the code (or the full URL): ")?;
    out.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let code = extract_code(&line);
    if code.is_empty() {
        bail!("no authorization code provided");
    }

    let tokens = client
        .exchange_code(code, &config.oura_redirect_uri)
        .await
        .context("authorization code exchange failed (codes expire quickly; check the redirect URI)")?;

    let store = Arc::new(FileStore::open(&config.token_store_path).await?);
    let state = AppState::new(config.clone(), store);
    state.token_manager.persist(&tokens).await?;

    writeln!(out, "\nTokens saved to {}", config.token_store_path)?;
    Ok(())
}

/// Accept either the bare code or a redirect URL containing `code=`.
fn extract_code(input: &str) -> &str {
    let input = input.trim();
    match input.split_once("code=") {
        Some((_, rest)) => rest.split('&').next().unwrap_or_default(),
        None => input,
    }
}
