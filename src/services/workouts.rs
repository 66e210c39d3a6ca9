// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout normalizer: raw workout payloads to normalized workouts plus
//! optional GPS routes.
//!
//! Pure functions, no I/O. A workout without an external identifier is
//! rejected outright; everything else degrades per-field.

use crate::models::metric::NumberInput;
use crate::models::workout::{
    HeartRateSample, Measurement, NormalizedRoute, NormalizedWorkout, RawHeartRateSample,
    RawLocation, RawQuantity, RawWorkout, RoutePoint,
};
use crate::time_utils::{resolve_timestamp, TimestampInput};
use chrono::{DateTime, Utc};

/// Name recorded for workouts that don't carry one.
const UNNAMED_WORKOUT: &str = "Workout";

/// Normalize one raw workout into a workout record and an optional route.
///
/// Returns `None` when the workout carries no external identifier; the
/// record is excluded from its batch without failing the batch.
pub fn normalize_workout(raw: &RawWorkout) -> Option<(NormalizedWorkout, Option<NormalizedRoute>)> {
    let workout_id = match raw.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            tracing::warn!(name = ?raw.name, "Rejecting workout without an external identifier");
            return None;
        }
    };

    let heart_rate_data = normalize_samples(&raw.heart_rate_data);
    let heart_rate_recovery = normalize_samples(&raw.heart_rate_recovery);

    // Derive summary heart-rate fields only when the exporter didn't
    // supply them; supplied values are never overwritten.
    let max_heart_rate = quantity_value(&raw.max_heart_rate)
        .or_else(|| derived_max_heart_rate(&heart_rate_data));
    let avg_heart_rate = quantity_value(&raw.avg_heart_rate)
        .or_else(|| derived_avg_heart_rate(&heart_rate_data));

    let workout = NormalizedWorkout {
        workout_id: workout_id.clone(),
        name: raw
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNNAMED_WORKOUT.to_string()),
        start: resolve_optional(&raw.start),
        end: resolve_optional(&raw.end),
        duration: raw.duration.unwrap_or(0.0).max(0.0),
        distance: normalize_quantity(&raw.distance),
        active_energy_burned: normalize_quantity(&raw.active_energy_burned),
        total_energy: normalize_quantity(&raw.total_energy),
        elevation_up: normalize_quantity(&raw.elevation_up),
        step_count: normalize_quantity(&raw.step_count),
        step_cadence: normalize_quantity(&raw.step_cadence),
        heart_rate_data,
        heart_rate_recovery,
        max_heart_rate,
        avg_heart_rate,
    };

    let route = normalize_route(workout_id, &raw.route);

    Some((workout, route))
}

fn normalize_route(workout_id: String, raw: &[RawLocation]) -> Option<NormalizedRoute> {
    let locations: Vec<RoutePoint> = raw
        .iter()
        .filter_map(|loc| {
            let (lat, lon) = (loc.lat?, loc.lon?);
            Some(RoutePoint {
                lat,
                lon,
                altitude: loc.altitude,
                timestamp: resolve_optional(&loc.timestamp),
            })
        })
        .collect();

    // A stored route is never empty
    if locations.is_empty() {
        None
    } else {
        Some(NormalizedRoute {
            workout_id,
            locations,
        })
    }
}

fn normalize_samples(raw: &[RawHeartRateSample]) -> Vec<HeartRateSample> {
    raw.iter()
        .map(|s| HeartRateSample {
            date: resolve_optional(&s.date),
            min: num(&s.min),
            avg: num(&s.avg),
            max: num(&s.max),
        })
        .collect()
}

fn normalize_quantity(raw: &Option<RawQuantity>) -> Option<Measurement> {
    let raw = raw.as_ref()?;
    Some(Measurement {
        qty: num(&raw.qty)?,
        units: raw.units.clone().unwrap_or_default(),
        date: resolve_optional(&raw.date),
    })
}

fn quantity_value(raw: &Option<RawQuantity>) -> Option<f64> {
    raw.as_ref().and_then(|q| num(&q.qty))
}

fn derived_max_heart_rate(samples: &[HeartRateSample]) -> Option<f64> {
    samples
        .iter()
        .filter_map(|s| s.max)
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

fn derived_avg_heart_rate(samples: &[HeartRateSample]) -> Option<f64> {
    let values: Vec<f64> = samples.iter().filter_map(|s| s.avg).collect();
    if values.is_empty() {
        return None;
    }
    Some(round2(values.iter().sum::<f64>() / values.len() as f64))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn num(input: &Option<NumberInput>) -> Option<f64> {
    input.as_ref().and_then(NumberInput::as_f64)
}

fn resolve_optional(input: &Option<TimestampInput>) -> Option<DateTime<Utc>> {
    input.as_ref().and_then(resolve_timestamp)
}
