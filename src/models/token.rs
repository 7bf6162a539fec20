// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token pair as held in the token store.

use serde::Deserialize;

/// Tokens read from the store at the start of a request.
///
/// Every field is optional on read: a fresh store may hold only a refresh
/// token, and the expiry is stored as a decimal string that may not parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRecord {
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    /// Absolute access token expiry (epoch milliseconds)
    pub access_expires_at_ms: Option<i64>,
}

impl TokenRecord {
    /// Parse the stored expiry string. Anything unparseable is treated as absent.
    pub fn parse_expiry(raw: Option<&str>) -> Option<i64> {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
    }

    /// The access token, if present and not yet expired at `now_ms`.
    ///
    /// Valid while `now_ms <= expiry`; a missing expiry counts as expired.
    pub fn usable_access_token(&self, now_ms: i64) -> Option<&str> {
        let token = self.access_token.as_deref().filter(|t| !t.is_empty())?;
        let expires_at = self.access_expires_at_ms?;
        (now_ms <= expires_at).then_some(token)
    }
}

/// Token endpoint response for both refresh and code grants.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenResponse {
    /// Absolute expiry in epoch milliseconds for a token issued at `now_ms`.
    pub fn expires_at_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_add(self.expires_in.saturating_mul(1000))
    }
}
