// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod metrics;
pub mod oura;
pub mod token;

pub use metrics::MetricsAggregator;
pub use oura::{FetchError, OuraClient};
pub use token::TokenManager;
