// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The refresh_token grant was rejected (or never answered) by the token endpoint.
    #[error("Token refresh failed with status {status}: {details}")]
    AuthRefresh { status: u16, details: String },

    /// The primary (sleep) collection could not be read.
    #[error("Failed to fetch sleep data for {start_date}..{end_date} (status {status}): {details}")]
    UpstreamFetch {
        status: u16,
        details: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("No refresh token in token store")]
    MissingRefreshToken,

    #[error("Token store error: {0}")]
    Store(String),
}

/// Status used when the upstream never produced a usable HTTP status.
pub const TRANSPORT_FAILURE_STATUS: u16 = 502;

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// JSON body for failures passed through from the Oura API.
#[derive(Serialize)]
struct UpstreamErrorResponse<'a> {
    error: &'static str,
    status: u16,
    details: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<NaiveDate>,
}

fn passthrough_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

fn upstream_response(
    error: &'static str,
    status: u16,
    details: &str,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Response {
    let body = UpstreamErrorResponse {
        error,
        status,
        details,
        start_date: range.map(|(start, _)| start),
        end_date: range.map(|(_, end)| end),
    };
    (passthrough_status(status), Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::AuthRefresh { status, details } => {
                tracing::warn!(status, "Token refresh failed");
                return upstream_response("Token refresh failed", *status, details, None);
            }
            AppError::UpstreamFetch {
                status,
                details,
                start_date,
                end_date,
            } => {
                tracing::warn!(status, %start_date, %end_date, "Sleep fetch failed");
                return upstream_response(
                    "Failed to fetch sleep data",
                    *status,
                    details,
                    Some((*start_date, *end_date)),
                );
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::MissingRefreshToken => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "missing_refresh_token",
                Some("Run oura-token or set OURA_REFRESH_TOKEN".to_string()),
            ),
            AppError::Store(msg) => {
                tracing::error!(error = %msg, "Token store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
