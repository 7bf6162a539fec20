// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fetch sleep, SpO2 and VO2 max for a date range and merge them by day.

use crate::error::AppError;
use crate::models::{
    Collection, DailyMetrics, DailySpo2, DateRange, MetricsResponse, SleepPeriod, Vo2Max,
};
use crate::services::oura::{collections, FetchError};
use crate::services::OuraClient;
use chrono::NaiveDate;
use serde_json::Number;
use std::collections::{BTreeMap, HashMap};

/// Reads the three Oura collections and folds them into one response.
#[derive(Clone)]
pub struct MetricsAggregator {
    client: OuraClient,
}

impl MetricsAggregator {
    pub fn new(client: OuraClient) -> Self {
        Self { client }
    }

    /// Fetch all three collections concurrently and merge them.
    ///
    /// Sleep is the primary source: its failure fails the request, and its
    /// days are the days of the output. SpO2 and VO2 max are best-effort and
    /// degrade to `null` values when unavailable.
    pub async fn fetch_and_merge(
        &self,
        access_token: &str,
        range: &DateRange,
    ) -> Result<MetricsResponse, AppError> {
        let (sleep, spo2, vo2) = tokio::join!(
            self.client
                .get_collection::<SleepPeriod>(collections::SLEEP, access_token, range),
            self.client
                .get_collection::<DailySpo2>(collections::DAILY_SPO2, access_token, range),
            self.client
                .get_collection::<Vo2Max>(collections::VO2_MAX, access_token, range),
        );

        let sleep = sleep.map_err(|e| AppError::UpstreamFetch {
            status: e.status(),
            details: e.details().to_string(),
            start_date: range.start,
            end_date: range.end,
        })?;
        let spo2 = best_effort(collections::DAILY_SPO2, spo2);
        let vo2 = best_effort(collections::VO2_MAX, vo2);

        let raw_data_count = sleep.raw_count;
        let days = merge(&sleep.data, &spo2.data, &vo2.data);

        tracing::debug!(
            start = %range.start,
            end = %range.end,
            sleep_records = raw_data_count,
            spo2_records = spo2.data.len(),
            vo2_records = vo2.data.len(),
            days = days.len(),
            "Merged Oura metrics"
        );

        Ok(MetricsResponse::from_days(days, range, raw_data_count))
    }
}

/// Secondary collections degrade to empty on any failure.
fn best_effort<T>(collection: &str, result: Result<Collection<T>, FetchError>) -> Collection<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(collection, status = e.status(), error = %e, "Secondary fetch failed, continuing without it");
        Collection::empty()
    })
}

/// Join secondary values onto the sleep days.
///
/// Folds `sleep` in its given order into a map keyed by day: when several
/// sleep periods share a day, the last one wins. The result is ordered by
/// day and depends only on the inputs, not on how they were fetched.
pub fn merge(sleep: &[SleepPeriod], spo2: &[DailySpo2], vo2: &[Vo2Max]) -> Vec<DailyMetrics> {
    let spo2_by_day: HashMap<NaiveDate, Option<Number>> = spo2
        .iter()
        .map(|r| (r.day, r.spo2_percentage.as_ref().and_then(|p| p.value())))
        .collect();
    let vo2_by_day: HashMap<NaiveDate, Option<Number>> =
        vo2.iter().map(|r| (r.day, r.vo2_max.clone())).collect();

    sleep
        .iter()
        .fold(BTreeMap::new(), |mut days, period| {
            days.insert(
                period.day,
                DailyMetrics {
                    date: period.day,
                    hrv: period.average_hrv.clone(),
                    rhr: period.lowest_heart_rate.clone(),
                    spo2: spo2_by_day.get(&period.day).cloned().flatten(),
                    vo2_max: vo2_by_day.get(&period.day).cloned().flatten(),
                },
            );
            days
        })
        .into_values()
        .collect()
}
