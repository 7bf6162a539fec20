// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token lifecycle tests against a mock Oura token endpoint.

use chrono::Utc;
use oura_proxy::error::AppError;
use oura_proxy::store::{keys, MemoryStore, TokenStore};
use oura_proxy::AppState;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{expired_token_store, live_token_store, test_config, LIVE_TOKEN};

const LIFETIME_SECS: i64 = 86_400;

async fn mount_refresh_success(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=stored_refresh_token"))
        .and(body_string_contains("client_id=test_client_id"))
        .and(body_string_contains("client_secret=test_secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new_access_token",
            "refresh_token": "new_refresh_token",
            "expires_in": LIFETIME_SECS,
            "token_type": "bearer"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn state_with(server: &MockServer, store: Arc<MemoryStore>) -> AppState {
    AppState::new(test_config(server), store)
}

#[tokio::test]
async fn test_live_token_skips_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let store = live_token_store();
    let state = state_with(&server, store.clone());

    let token = state.token_manager.ensure_valid_access_token().await.unwrap();

    assert_eq!(token, LIVE_TOKEN);
    assert_eq!(store.write_count(), 0, "Fast path must not write");
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_persisted() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, 1).await;

    let store = expired_token_store();
    let state = state_with(&server, store.clone());

    let before_ms = Utc::now().timestamp_millis();
    let token = state.token_manager.ensure_valid_access_token().await.unwrap();

    assert_eq!(token, "new_access_token");
    assert_eq!(
        store.get(keys::ACCESS_TOKEN).await.unwrap().as_deref(),
        Some("new_access_token")
    );
    assert_eq!(
        store.get(keys::REFRESH_TOKEN).await.unwrap().as_deref(),
        Some("new_refresh_token")
    );

    let expires: i64 = store
        .get(keys::ACCESS_EXPIRES)
        .await
        .unwrap()
        .unwrap()
        .parse()
        .unwrap();
    assert!(expires > before_ms + LIFETIME_SECS * 1000 - 1000);
    assert_eq!(store.write_count(), 3);
}

#[tokio::test]
async fn test_missing_access_token_is_refreshed() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, 1).await;

    let store = Arc::new(MemoryStore::with_entries([(
        keys::REFRESH_TOKEN,
        "stored_refresh_token",
    )]));
    let state = state_with(&server, store.clone());

    let token = state.token_manager.ensure_valid_access_token().await.unwrap();
    assert_eq!(token, "new_access_token");

    // Second call uses the persisted token
    let again = state.token_manager.ensure_valid_access_token().await.unwrap();
    assert_eq!(again, "new_access_token");
    assert_eq!(store.write_count(), 3);
}

#[tokio::test]
async fn test_unparseable_expiry_counts_as_expired() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, 1).await;

    let store = Arc::new(MemoryStore::with_entries([
        (keys::REFRESH_TOKEN, "stored_refresh_token"),
        (keys::ACCESS_TOKEN, "stale_access_token"),
        (keys::ACCESS_EXPIRES, "next tuesday"),
    ]));
    let state = state_with(&server, store);

    let token = state.token_manager.ensure_valid_access_token().await.unwrap();
    assert_eq!(token, "new_access_token");
}

#[tokio::test]
async fn test_rejected_refresh_persists_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let store = expired_token_store();
    let state = state_with(&server, store.clone());

    let err = state
        .token_manager
        .ensure_valid_access_token()
        .await
        .unwrap_err();

    match err {
        AppError::AuthRefresh { status, details } => {
            assert_eq!(status, 400);
            assert_eq!(details, r#"{"error":"invalid_grant"}"#);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.write_count(), 0);
    assert_eq!(
        store.get(keys::REFRESH_TOKEN).await.unwrap().as_deref(),
        Some("stored_refresh_token")
    );
}

#[tokio::test]
async fn test_concurrent_requests_share_one_refresh() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, 1).await;

    let store = expired_token_store();
    let state = Arc::new(state_with(&server, store.clone()));

    let mut handles = vec![];
    for _ in 0..8 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            state.token_manager.ensure_valid_access_token().await
        }));
    }

    for handle in handles {
        let token = handle
            .await
            .expect("Task join failed")
            .expect("Token should be available");
        assert_eq!(token, "new_access_token");
    }

    assert_eq!(store.write_count(), 3, "Exactly one refresh should be persisted");
}
