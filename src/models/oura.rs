// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Oura v2 usercollection payloads (only the fields we merge).
//!
//! Records are extracted one at a time from raw JSON so a single odd record
//! cannot take the rest of its collection down with it: a record whose `day`
//! does not parse is skipped, and a metric that is not a number reads as null.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Number, Value};

/// A per-day record that can be pulled out of one raw collection item.
pub trait DayRecord: Sized {
    /// `None` when the item has no usable `day`.
    fn from_record(record: &Value) -> Option<Self>;
}

/// Envelope shared by all usercollection endpoints.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    pub data: Vec<T>,
    /// Items in the upstream `data` list, including skipped ones
    pub raw_count: usize,
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(default)]
    data: Value,
}

impl<T: DayRecord> Collection<T> {
    /// Decode a collection body, skipping items without a usable day.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let raw: RawCollection = serde_json::from_str(body)?;
        let items = raw.data.as_array().map(Vec::as_slice).unwrap_or_default();

        let data: Vec<T> = items.iter().filter_map(T::from_record).collect();
        if data.len() < items.len() {
            tracing::debug!(
                skipped = items.len() - data.len(),
                "Skipped collection records without a usable day"
            );
        }

        Ok(Self {
            data,
            raw_count: items.len(),
        })
    }
}

impl<T> Collection<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            raw_count: 0,
        }
    }
}

fn day_of(record: &Value) -> Option<NaiveDate> {
    record
        .get("day")?
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn number_field(record: &Value, field: &str) -> Option<Number> {
    match record.get(field)? {
        Value::Number(n) => Some(n.clone()),
        _ => None,
    }
}

/// One sleep period from `/v2/usercollection/sleep`.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepPeriod {
    pub day: NaiveDate,
    pub average_hrv: Option<Number>,
    pub lowest_heart_rate: Option<Number>,
}

impl DayRecord for SleepPeriod {
    fn from_record(record: &Value) -> Option<Self> {
        Some(Self {
            day: day_of(record)?,
            average_hrv: number_field(record, "average_hrv"),
            lowest_heart_rate: number_field(record, "lowest_heart_rate"),
        })
    }
}

/// One day from `/v2/usercollection/daily_spo2`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySpo2 {
    pub day: NaiveDate,
    pub spo2_percentage: Option<Spo2Reading>,
}

impl DayRecord for DailySpo2 {
    fn from_record(record: &Value) -> Option<Self> {
        Some(Self {
            day: day_of(record)?,
            spo2_percentage: record.get("spo2_percentage").and_then(Spo2Reading::from_value),
        })
    }
}

/// SpO2 percentage, reported either as `{ "average": n }` or as a bare number.
#[derive(Debug, Clone, PartialEq)]
pub enum Spo2Reading {
    Composite { average: Option<Number> },
    Scalar(Number),
}

impl Spo2Reading {
    /// Anything other than an object or a number is no reading at all.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(_) => Some(Spo2Reading::Composite {
                average: number_field(value, "average"),
            }),
            Value::Number(n) => Some(Spo2Reading::Scalar(n.clone())),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<Number> {
        match self {
            Spo2Reading::Composite { average } => average.clone(),
            Spo2Reading::Scalar(value) => Some(value.clone()),
        }
    }
}

/// One day from `/v2/usercollection/vO2_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vo2Max {
    pub day: NaiveDate,
    pub vo2_max: Option<Number>,
}

impl DayRecord for Vo2Max {
    fn from_record(record: &Value) -> Option<Self> {
        Some(Self {
            day: day_of(record)?,
            vo2_max: number_field(record, "vo2_max"),
        })
    }
}
