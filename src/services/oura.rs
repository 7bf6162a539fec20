// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Oura API client.
//!
//! Handles:
//! - The OAuth token endpoint (refresh and authorization-code grants)
//! - Per-day usercollection reads scoped to a date range

use crate::error::{AppError, TRANSPORT_FAILURE_STATUS};
use crate::models::oura::DayRecord;
use crate::models::{Collection, DateRange, TokenResponse};

/// Scopes requested when authorizing the app.
const OAUTH_SCOPES: &str = "daily spo2 workout personal heart_health stress session heartrate";

/// Oura usercollection endpoints read by this service.
pub mod collections {
    pub const SLEEP: &str = "sleep";
    pub const DAILY_SPO2: &str = "daily_spo2";
    pub const VO2_MAX: &str = "vO2_max";
}

/// Why a collection read did not produce data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    /// Upstream status, or 502 when the request never got a usable answer.
    pub fn status(&self) -> u16 {
        match self {
            FetchError::Status { status, .. } => *status,
            FetchError::Transport(_) => TRANSPORT_FAILURE_STATUS,
        }
    }

    /// Raw upstream body or transport error text.
    pub fn details(&self) -> &str {
        match self {
            FetchError::Status { body, .. } => body,
            FetchError::Transport(msg) => msg,
        }
    }
}

/// Oura API client.
#[derive(Clone)]
pub struct OuraClient {
    http: reqwest::Client,
    api_base_url: String,
    token_url: String,
    authorize_url: String,
    client_id: String,
    client_secret: String,
}

impl OuraClient {
    /// Create a new Oura client with OAuth credentials.
    pub fn new(
        api_base_url: String,
        token_url: String,
        authorize_url: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base_url,
            token_url,
            authorize_url,
            client_id,
            client_secret,
        }
    }

    /// Build a client from application config.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            config.oura_api_base_url.clone(),
            config.oura_token_url.clone(),
            config.oura_authorize_url.clone(),
            config.oura_client_id.clone(),
            config.oura_client_secret.clone(),
        )
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// Oura rotates the refresh token: the one passed in is dead once this succeeds.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        self.token_grant(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ])
        .await
    }

    /// Exchange an authorization code for the initial token pair.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, AppError> {
        self.token_grant(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ])
        .await
    }

    /// URL the user opens to grant access.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}",
            self.authorize_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(OAUTH_SCOPES),
        )
    }

    async fn token_grant(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AppError> {
        let transport = |e: reqwest::Error| AppError::AuthRefresh {
            status: TRANSPORT_FAILURE_STATUS,
            details: format!("Token request failed: {}", e),
        };

        let response = self
            .http
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let details = response.text().await.unwrap_or_default();
            return Err(AppError::AuthRefresh { status, details });
        }

        let body = response.text().await.map_err(transport)?;
        serde_json::from_str(&body).map_err(|e| AppError::AuthRefresh {
            status: TRANSPORT_FAILURE_STATUS,
            details: format!("Failed to parse token response: {}", e),
        })
    }

    /// Read one usercollection for the given date range.
    pub async fn get_collection<T: DayRecord>(
        &self,
        collection: &str,
        access_token: &str,
        range: &DateRange,
    ) -> Result<Collection<T>, FetchError> {
        let url = format!("{}/v2/usercollection/{}", self.api_base_url, collection);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("start_date", range.start.to_string()),
                ("end_date", range.end.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            if status == 429 {
                tracing::warn!(collection, "Oura rate limit hit (429)");
            }
            return Err(FetchError::Status { status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Collection::from_json(&body)
            .map_err(|e| FetchError::Transport(format!("JSON parse error: {}", e)))
    }
}
