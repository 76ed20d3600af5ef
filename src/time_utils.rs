// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

/// Largest absolute millisecond offset a browser `Date` accepts (±100M days).
const MAX_DATE_MILLIS: i64 = 8_640_000_000_000_000;

pub const INVALID_DATE: &str = "Invalid Date";

/// Format epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.sssZ`.
///
/// Years outside 0..=9999 use the signed six-digit form (`+055840-...`).
/// Offsets a browser `Date` cannot hold yield [`INVALID_DATE`].
pub fn format_iso_millis(millis: i64) -> String {
    if millis.unsigned_abs() > MAX_DATE_MILLIS as u64 {
        return INVALID_DATE.to_string();
    }
    let Some(date) = DateTime::<Utc>::from_timestamp_millis(millis) else {
        return INVALID_DATE.to_string();
    };

    if (0..=9999).contains(&date.year()) {
        date.to_rfc3339_opts(SecondsFormat::Millis, true)
    } else {
        format!(
            "{:+07}-{}",
            date.year(),
            date.format("%m-%dT%H:%M:%S%.3fZ")
        )
    }
}
