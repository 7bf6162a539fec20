// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Merged per-day health metrics and the response envelope.

use crate::error::AppError;
use crate::time_utils::previous_day;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::Number;

/// Message returned with the empty envelope.
pub const NO_DATA_MESSAGE: &str = "No sleep data found for this date range";

/// Inclusive calendar date range sent to every Oura collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Resolve caller overrides against the yesterday..today default.
    ///
    /// Each bound is overridden independently; empty strings count as absent.
    /// `start > end` is passed through unchanged.
    pub fn resolve(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        let start = parse_date_param("start_date", start)?.unwrap_or_else(|| previous_day(today));
        let end = parse_date_param("end_date", end)?.unwrap_or(today);
        Ok(Self { start, end })
    }
}

fn parse_date_param(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                AppError::BadRequest(format!("Invalid '{}' parameter: must be YYYY-MM-DD", name))
            })
        })
        .transpose()
}

/// One merged day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMetrics {
    pub date: NaiveDate,
    pub hrv: Option<Number>,
    pub rhr: Option<Number>,
    pub spo2: Option<Number>,
    pub vo2_max: Option<Number>,
}

/// Response shape, chosen by how many days were merged.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsResponse {
    /// No sleep records: echo the query for diagnosis.
    Empty {
        queried_start: NaiveDate,
        queried_end: NaiveDate,
        /// Number of records the sleep collection returned
        raw_data_count: usize,
    },
    /// Exactly one day, flattened to the top level.
    Single(DailyMetrics),
    /// Two or more days.
    Many(Vec<DailyMetrics>),
}

impl MetricsResponse {
    /// Pick the envelope for a merged set of days.
    pub fn from_days(mut days: Vec<DailyMetrics>, range: &DateRange, raw_data_count: usize) -> Self {
        match days.len() {
            0 => MetricsResponse::Empty {
                queried_start: range.start,
                queried_end: range.end,
                raw_data_count,
            },
            1 => MetricsResponse::Single(days.remove(0)),
            _ => MetricsResponse::Many(days),
        }
    }

    /// Number of merged days in the response.
    pub fn count(&self) -> usize {
        match self {
            MetricsResponse::Empty { .. } => 0,
            MetricsResponse::Single(_) => 1,
            MetricsResponse::Many(days) => days.len(),
        }
    }
}

#[derive(Serialize)]
struct EmptyBody<'a> {
    data: [DailyMetrics; 0],
    count: usize,
    queried_start: &'a NaiveDate,
    queried_end: &'a NaiveDate,
    raw_data_count: usize,
    message: &'static str,
}

#[derive(Serialize)]
struct SingleBody<'a> {
    hrv: &'a Option<Number>,
    rhr: &'a Option<Number>,
    spo2: &'a Option<Number>,
    vo2_max: &'a Option<Number>,
    date: &'a NaiveDate,
}

#[derive(Serialize)]
struct ManyBody<'a> {
    data: &'a [DailyMetrics],
    count: usize,
}

impl Serialize for MetricsResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricsResponse::Empty {
                queried_start,
                queried_end,
                raw_data_count,
            } => EmptyBody {
                data: [],
                count: 0,
                queried_start,
                queried_end,
                raw_data_count: *raw_data_count,
                message: NO_DATA_MESSAGE,
            }
            .serialize(serializer),
            MetricsResponse::Single(day) => SingleBody {
                hrv: &day.hrv,
                rhr: &day.rhr,
                spo2: &day.spo2,
                vo2_max: &day.vo2_max,
                date: &day.date,
            }
            .serialize(serializer),
            MetricsResponse::Many(days) => ManyBody {
                data: days,
                count: days.len(),
            }
            .serialize(serializer),
        }
    }
}
