// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token lifecycle against the token store.

use crate::error::AppError;
use crate::models::{TokenRecord, TokenResponse};
use crate::services::OuraClient;
use crate::store::{keys, TokenStore};
use crate::time_utils::{format_epoch_ms, now_epoch_ms};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Keeps a valid Oura access token available.
///
/// The token store is injected so tests can use `MemoryStore` and the server
/// a durable store. Refreshes are single-flight within this process: Oura
/// rotates the refresh token on every use, so two concurrent refreshes would
/// leave the loser holding a dead refresh token.
#[derive(Clone)]
pub struct TokenManager {
    client: OuraClient,
    store: Arc<dyn TokenStore>,
    /// Serializes the refresh path (fast path never takes it).
    refresh_lock: Arc<Mutex<()>>,
}

impl TokenManager {
    pub fn new(client: OuraClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            store,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Read the token triple from the store.
    pub async fn load(&self) -> Result<TokenRecord, AppError> {
        let refresh_token = self.store.get(keys::REFRESH_TOKEN).await?;
        let access_token = self.store.get(keys::ACCESS_TOKEN).await?;
        let expires = self.store.get(keys::ACCESS_EXPIRES).await?;

        Ok(TokenRecord {
            refresh_token,
            access_token,
            access_expires_at_ms: TokenRecord::parse_expiry(expires.as_deref()),
        })
    }

    /// Return a usable access token, refreshing it first if it has expired.
    ///
    /// 1. Read the store; a live access token is returned with no I/O beyond the read
    /// 2. Otherwise take the refresh lock and re-read (another task may have refreshed)
    /// 3. Run the refresh_token grant and persist the rotated pair
    pub async fn ensure_valid_access_token(&self) -> Result<String, AppError> {
        let record = self.load().await?;
        if let Some(token) = record.usable_access_token(now_epoch_ms()) {
            return Ok(token.to_string());
        }

        let _guard = self.refresh_lock.lock().await;

        let record = self.load().await?;
        if let Some(token) = record.usable_access_token(now_epoch_ms()) {
            tracing::debug!("Access token refreshed by a concurrent request");
            return Ok(token.to_string());
        }

        let refresh_token = record
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingRefreshToken)?;

        tracing::info!(
            had_access_token = record.access_token.is_some(),
            "Access token missing or expired, refreshing"
        );

        let tokens = self.client.refresh_token(&refresh_token).await?;
        let expires_at = self.persist(&tokens).await?;

        tracing::info!(expires_at = %format_epoch_ms(expires_at), "Access token refreshed");
        Ok(tokens.access_token)
    }

    /// Write a freshly issued token pair. Returns the stored expiry.
    ///
    /// Three independent writes; the refresh token goes first since the old
    /// one is already dead upstream.
    pub async fn persist(&self, tokens: &TokenResponse) -> Result<i64, AppError> {
        let expires_at = tokens.expires_at_ms(now_epoch_ms());

        self.store
            .put(keys::REFRESH_TOKEN, &tokens.refresh_token)
            .await?;
        self.store
            .put(keys::ACCESS_TOKEN, &tokens.access_token)
            .await?;
        self.store
            .put(keys::ACCESS_EXPIRES, &expires_at.to_string())
            .await?;

        Ok(expires_at)
    }

    /// Write `refresh_token` if the store has none yet. Returns whether it was written.
    pub async fn seed_refresh_token(&self, refresh_token: &str) -> Result<bool, AppError> {
        let existing = self.store.get(keys::REFRESH_TOKEN).await?;
        if existing.is_some_and(|t| !t.is_empty()) {
            return Ok(false);
        }

        self.store.put(keys::REFRESH_TOKEN, refresh_token).await?;
        tracing::info!("Token store seeded with configured refresh token");
        Ok(true)
    }
}
