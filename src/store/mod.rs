// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable token storage.
//!
//! The token store is a plain string key/value map. Writes are independent:
//! there is no multi-key transaction, so a refresh persists its three keys
//! one at a time.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use async_trait::async_trait;

/// Key names as constants.
pub mod keys {
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Access token expiry as epoch milliseconds (decimal string)
    pub const ACCESS_EXPIRES: &str = "access_expires";
}

/// String-keyed get/put storage for the OAuth token pair.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn put(&self, key: &str, value: &str) -> Result<(), AppError>;
}
