// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Oura-Proxy: daily recovery metrics from the Oura Ring API
//!
//! This crate keeps an Oura OAuth token pair fresh in a durable store and
//! serves sleep HRV, resting heart rate, SpO2 and VO2 max merged per day.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod time_utils;

use config::Config;
use services::{MetricsAggregator, OuraClient, TokenManager};
use std::sync::Arc;
use store::TokenStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub token_manager: TokenManager,
    pub aggregator: MetricsAggregator,
}

impl AppState {
    /// Wire the services for `config` around the given token store.
    pub fn new(config: Config, store: Arc<dyn TokenStore>) -> Self {
        let client = OuraClient::from_config(&config);
        Self {
            token_manager: TokenManager::new(client.clone(), store),
            aggregator: MetricsAggregator::new(client),
            config,
        }
    }
}
