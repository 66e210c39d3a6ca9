// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timestamp resolution for the date encodings health exports actually ship.
//!
//! Export payloads mix numeric epochs, epoch-as-string, bare dates and
//! local datetime strings. Everything resolves to `DateTime<Utc>`; inputs
//! that resolve to nothing cause the containing record to be skipped by
//! the normalizers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A timestamp as it appears on the wire: numeric epoch or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampInput {
    Epoch(f64),
    Text(String),
}

/// Epoch values at or above this magnitude are milliseconds, below it seconds.
const EPOCH_MILLIS_CUTOFF: f64 = 100_000_000_000.0;

/// Resolve a raw timestamp input to a UTC instant.
///
/// Accepted forms: epoch millis/seconds (number or numeric string),
/// RFC 3339, `YYYY-MM-DD HH:MM:SS ±HHMM` (the export tool's native form),
/// `YYYY-MM-DD HH:MM:SS` (assumed UTC), `YYYY-MM-DD` and `YYYY/MM/DD`.
pub fn resolve_timestamp(input: &TimestampInput) -> Option<DateTime<Utc>> {
    match input {
        TimestampInput::Epoch(n) => resolve_epoch(*n),
        TimestampInput::Text(s) => resolve_text(s.trim()),
    }
}

fn resolve_epoch(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }
    let millis = if n.abs() >= EPOCH_MILLIS_CUTOFF {
        n
    } else {
        n * 1000.0
    };
    DateTime::from_timestamp_millis(millis as i64)
}

fn resolve_text(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(n) = s.parse::<f64>() {
        return resolve_epoch(n);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
    }

    None
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
