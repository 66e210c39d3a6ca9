// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout models: raw export payloads, normalized workouts and GPS routes.

use crate::models::metric::NumberInput;
use crate::time_utils::TimestampInput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw workout session as pushed by the export tool.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWorkout {
    /// External workout identifier. Required; a workout without one is
    /// rejected, never defaulted.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start: Option<TimestampInput>,
    #[serde(default)]
    pub end: Option<TimestampInput>,
    /// Duration in a consistent unit as provided by the exporter
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub distance: Option<RawQuantity>,
    #[serde(default)]
    pub active_energy_burned: Option<RawQuantity>,
    #[serde(default)]
    pub total_energy: Option<RawQuantity>,
    #[serde(default)]
    pub elevation_up: Option<RawQuantity>,
    #[serde(default)]
    pub step_count: Option<RawQuantity>,
    #[serde(default)]
    pub step_cadence: Option<RawQuantity>,
    #[serde(default)]
    pub max_heart_rate: Option<RawQuantity>,
    #[serde(default)]
    pub avg_heart_rate: Option<RawQuantity>,
    #[serde(default)]
    pub heart_rate_data: Vec<RawHeartRateSample>,
    #[serde(default)]
    pub heart_rate_recovery: Vec<RawHeartRateSample>,
    /// GPS point sequence; an empty sequence means no route is stored
    #[serde(default)]
    pub route: Vec<RawLocation>,
}

/// A date-bearing quantity sub-record ({qty, units, date}).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuantity {
    #[serde(default)]
    pub qty: Option<NumberInput>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub date: Option<TimestampInput>,
}

/// One heart-rate series sample.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHeartRateSample {
    #[serde(default)]
    pub date: Option<TimestampInput>,
    #[serde(default, rename = "Min")]
    pub min: Option<NumberInput>,
    #[serde(default, rename = "Avg")]
    pub avg: Option<NumberInput>,
    #[serde(default, rename = "Max")]
    pub max: Option<NumberInput>,
}

/// One raw GPS point.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<TimestampInput>,
}

/// Normalized workout record. Identity = `workout_id`, globally unique
/// across all workouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWorkout {
    pub workout_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Duration as provided, clamped to >= 0
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_energy_burned: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_energy: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_up: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_count: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_cadence: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub heart_rate_data: Vec<HeartRateSample>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub heart_rate_recovery: Vec<HeartRateSample>,
    /// Supplied by the exporter, or derived from the heart-rate series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_heart_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_heart_rate: Option<f64>,
}

/// A normalized quantity with resolved date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub qty: f64,
    #[serde(default)]
    pub units: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// A normalized heart-rate sample with resolved date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// GPS route stored separately from its workout. `workout_id` is a foreign
/// reference, not an ownership relation. If a route exists, `locations` is
/// non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRoute {
    pub workout_id: String,
    pub locations: Vec<RoutePoint>,
}

/// One resolved GPS point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}
