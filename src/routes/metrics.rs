// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Merged daily metrics endpoint.

use crate::error::Result;
use crate::models::{DateRange, MetricsResponse};
use crate::time_utils::utc_today;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    /// First day (YYYY-MM-DD), defaults to yesterday (UTC)
    start_date: Option<String>,
    /// Last day (YYYY-MM-DD), defaults to today (UTC)
    end_date: Option<String>,
}

/// Serve merged metrics. Mounted for every method and path.
///
/// A query string that does not decode (e.g. a repeated `start_date`) is a
/// JSON 400 like any other bad date.
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<MetricsQuery>, QueryRejection>,
) -> Result<Json<MetricsResponse>> {
    let Query(query) = query?;
    let range = DateRange::resolve(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        utc_today(),
    )?;

    let access_token = state.token_manager.ensure_valid_access_token().await?;
    let response = state
        .aggregator
        .fetch_and_merge(&access_token, &range)
        .await?;

    tracing::info!(
        start = %range.start,
        end = %range.end,
        days = response.count(),
        "Served metrics"
    );

    Ok(Json(response))
}
