//! Application configuration loaded from environment variables.
//!
//! The OAuth client credentials are fixed for the lifetime of the process;
//! only the token pair changes at runtime, and that lives in the token store.

use std::env;

const DEFAULT_API_BASE_URL: &str = "https://api.ouraring.com";
const DEFAULT_TOKEN_URL: &str = "https://api.ouraring.com/oauth/token";
const DEFAULT_AUTHORIZE_URL: &str = "https://cloud.ouraring.com/oauth/authorize";
const DEFAULT_REDIRECT_URI: &str = "https://example.com";
const DEFAULT_TOKEN_STORE_PATH: &str = "data/tokens.json";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Oura OAuth client ID
    pub oura_client_id: String,
    /// Oura OAuth client secret
    pub oura_client_secret: String,
    /// Refresh token used to seed an empty token store
    pub oura_refresh_token: Option<String>,
    /// Base URL of the Oura API (collections live under `/v2/usercollection`)
    pub oura_api_base_url: String,
    /// OAuth token endpoint
    pub oura_token_url: String,
    /// OAuth authorization page (used by `oura-token`)
    pub oura_authorize_url: String,
    /// Redirect URI registered with the Oura OAuth app
    pub oura_redirect_uri: String,
    /// Path of the JSON file backing the token store
    pub token_store_path: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            oura_client_id: env::var("OURA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OURA_CLIENT_ID"))?,
            oura_client_secret: env::var("OURA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OURA_CLIENT_SECRET"))?,
            oura_refresh_token: env::var("OURA_REFRESH_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            oura_api_base_url: env_or("OURA_API_BASE_URL", DEFAULT_API_BASE_URL),
            oura_token_url: env_or("OURA_TOKEN_URL", DEFAULT_TOKEN_URL),
            oura_authorize_url: env_or("OURA_AUTHORIZE_URL", DEFAULT_AUTHORIZE_URL),
            oura_redirect_uri: env_or("OURA_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            token_store_path: env_or("TOKEN_STORE_PATH", DEFAULT_TOKEN_STORE_PATH),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Config for tests; upstream URLs point nowhere until overridden.
    pub fn test_default() -> Self {
        Self {
            oura_client_id: "test_client_id".to_string(),
            oura_client_secret: "test_secret".to_string(),
            oura_refresh_token: None,
            oura_api_base_url: "http://127.0.0.1:9".to_string(),
            oura_token_url: "http://127.0.0.1:9/oauth/token".to_string(),
            oura_authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            oura_redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            token_store_path: DEFAULT_TOKEN_STORE_PATH.to_string(),
            port: 8080,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
