// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Metric models: raw export payloads and their normalized storage form.

use crate::time_utils::TimestampInput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A numeric field as it appears on the wire: number or numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// Coerce to f64; malformed values coerce to nothing and are dropped
    /// per-field by the normalizer.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberInput::Number(n) if n.is_finite() => Some(*n),
            NumberInput::Number(_) => None,
            NumberInput::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

/// One metric batch as pushed by the export tool.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMetricPayload {
    /// Metric kind identifier (e.g. "heart_rate", "step_count")
    pub name: String,
    /// Batch-level units, used when a record carries none
    #[serde(default)]
    pub units: Option<String>,
    /// The raw records
    #[serde(default)]
    pub data: Vec<RawRecord>,
}

/// One raw measurement. Field presence varies per metric kind; everything
/// a kind doesn't declare rides along in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub date: Option<TimestampInput>,
    #[serde(default)]
    pub qty: Option<NumberInput>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub source: Option<String>,

    // Blood pressure
    #[serde(default)]
    pub systolic: Option<NumberInput>,
    #[serde(default)]
    pub diastolic: Option<NumberInput>,

    // Heart rate
    #[serde(default, rename = "Min")]
    pub min: Option<NumberInput>,
    #[serde(default, rename = "Avg")]
    pub avg: Option<NumberInput>,
    #[serde(default, rename = "Max")]
    pub max: Option<NumberInput>,

    // Sleep stage durations
    #[serde(default)]
    pub asleep: Option<NumberInput>,
    #[serde(default)]
    pub core: Option<NumberInput>,
    #[serde(default)]
    pub deep: Option<NumberInput>,
    #[serde(default)]
    pub rem: Option<NumberInput>,
    #[serde(default)]
    pub awake: Option<NumberInput>,
    #[serde(default, rename = "inBed")]
    pub in_bed: Option<NumberInput>,
    #[serde(default, rename = "sleepStart")]
    pub sleep_start: Option<TimestampInput>,
    #[serde(default, rename = "sleepEnd")]
    pub sleep_end: Option<TimestampInput>,

    /// Free-form pass-through for generic kinds
    #[serde(flatten, default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A normalized, date-resolved, kind-typed metric record.
///
/// Identity within its kind's collection is (source, timestamp); the
/// document ID is derived from the pair, so re-ingesting the same identity
/// overwrites the prior record (last-write-wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetric {
    pub source: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub value: MetricValue,
}

/// The closed set of value shapes a metric can take. Every consumer sees
/// this finite set; there is no open untyped representation on the write
/// path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    BloodPressure {
        systolic: f64,
        diastolic: f64,
    },
    HeartRate {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        avg: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Sleep(SleepStages),
    Quantity(QuantityValue),
}

/// Generic single-quantity shape used by every kind without a dedicated one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantityValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<f64>,
    pub units: String,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Named sleep stage durations split out of a raw sleep record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepStages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asleep: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rem: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awake: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_bed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_end: Option<DateTime<Utc>>,
}

/// Stored metric as read back by the query endpoints.
///
/// Kinds are open-ended, so the read side carries the common identity
/// fields plus whatever the kind's shape wrote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMetric {
    pub source: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}
