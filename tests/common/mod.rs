// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::response::Response;
use chrono::{Duration, Utc};
use oura_proxy::config::Config;
use oura_proxy::routes::create_router;
use oura_proxy::store::{keys, MemoryStore};
use oura_proxy::AppState;
use serde_json::Value;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Access token held by `live_token_store()`.
#[allow(dead_code)]
pub const LIVE_TOKEN: &str = "live_access_token";

/// Config pointing both the API and the token endpoint at `server`.
#[allow(dead_code)]
pub fn test_config(server: &MockServer) -> Config {
    Config {
        oura_api_base_url: server.uri(),
        oura_token_url: format!("{}/oauth/token", server.uri()),
        ..Config::test_default()
    }
}

/// Store holding an access token that is valid for another hour.
#[allow(dead_code)]
pub fn live_token_store() -> Arc<MemoryStore> {
    let expires = (Utc::now() + Duration::hours(1))
        .timestamp_millis()
        .to_string();
    Arc::new(MemoryStore::with_entries([
        (keys::REFRESH_TOKEN, "stored_refresh_token"),
        (keys::ACCESS_TOKEN, LIVE_TOKEN),
        (keys::ACCESS_EXPIRES, expires.as_str()),
    ]))
}

/// Store whose access token expired a minute ago.
#[allow(dead_code)]
pub fn expired_token_store() -> Arc<MemoryStore> {
    let expires = (Utc::now() - Duration::minutes(1))
        .timestamp_millis()
        .to_string();
    Arc::new(MemoryStore::with_entries([
        (keys::REFRESH_TOKEN, "stored_refresh_token"),
        (keys::ACCESS_TOKEN, "stale_access_token"),
        (keys::ACCESS_EXPIRES, expires.as_str()),
    ]))
}

/// Create a test app against a mock Oura server.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(
    server: &MockServer,
    store: Arc<MemoryStore>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(test_config(server), store));
    (create_router(state.clone()), state)
}

/// Serve `body` for one usercollection endpoint.
#[allow(dead_code)]
pub async fn mount_collection(server: &MockServer, collection: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/usercollection/{}", collection)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Fail one usercollection endpoint with `status`.
#[allow(dead_code)]
pub async fn mount_collection_error(
    server: &MockServer,
    collection: &str,
    status: u16,
    body: &str,
) {
    Mock::given(method("GET"))
        .and(path(format!("/v2/usercollection/{}", collection)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
