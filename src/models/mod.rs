// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod metrics;
pub mod oura;
pub mod token;

pub use metrics::{DailyMetrics, DateRange, MetricsResponse};
pub use oura::{Collection, DayRecord, DailySpo2, SleepPeriod, Spo2Reading, Vo2Max};
pub use token::{TokenRecord, TokenResponse};
