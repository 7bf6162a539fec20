// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for dates and the token store clock.

use chrono::{DateTime, Days, NaiveDate, Utc};

/// Current time as epoch milliseconds, the representation kept in the token store.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Today's UTC calendar date.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The calendar date before `date`.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

/// Format an epoch-millisecond timestamp for logs.
pub fn format_epoch_ms(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_else(|| ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_day_crosses_year() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            previous_day(date),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_format_epoch_ms() {
        assert_eq!(format_epoch_ms(1_704_067_200_000), "2024-01-01T00:00:00Z");
    }
}
