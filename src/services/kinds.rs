// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Metric kind registry.
//!
//! Maps a metric kind identifier to its storage collection and shape.
//! Three kinds carry fixed shapes and dedicated collections; every other
//! identifier is accepted at call time and mapped to a per-kind collection
//! with the generic quantity shape, so new kinds need no code change.

use crate::db::collections;

/// The closed set of shape variants a kind can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricShape {
    BloodPressure,
    HeartRate,
    Sleep,
    /// Generic value + units + metadata pass-through
    Quantity,
}

/// Resolved schema for one metric kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSchema {
    /// Firestore collection the kind's records are stored in
    pub collection: String,
    pub shape: MetricShape,
}

/// Resolve a kind identifier by exact match; unmatched kinds fall back to
/// the generic shape in a deterministically-named collection.
pub fn resolve(kind: &str) -> KindSchema {
    match kind {
        "blood_pressure" => KindSchema {
            collection: collections::BLOOD_PRESSURE.to_string(),
            shape: MetricShape::BloodPressure,
        },
        "heart_rate" => KindSchema {
            collection: collections::HEART_RATE.to_string(),
            shape: MetricShape::HeartRate,
        },
        "sleep_analysis" => KindSchema {
            collection: collections::SLEEP.to_string(),
            shape: MetricShape::Sleep,
        },
        other => KindSchema {
            collection: collection_for_kind(other),
            shape: MetricShape::Quantity,
        },
    }
}

/// Derive a collection name from an arbitrary kind identifier.
///
/// Lowercases and collapses runs of non-alphanumerics to a single `_` so
/// the name is stable regardless of how the exporter spells the kind.
fn collection_for_kind(kind: &str) -> String {
    let mut name = String::with_capacity(kind.len());
    let mut last_was_separator = true;
    for c in kind.trim().chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator {
            name.push('_');
            last_was_separator = true;
        }
    }
    while name.ends_with('_') {
        name.pop();
    }
    if name.is_empty() {
        "unclassified".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_kinds_resolve_to_dedicated_shapes() {
        assert_eq!(resolve("blood_pressure").shape, MetricShape::BloodPressure);
        assert_eq!(resolve("heart_rate").shape, MetricShape::HeartRate);
        assert_eq!(resolve("sleep_analysis").shape, MetricShape::Sleep);
    }

    #[test]
    fn test_unknown_kind_falls_back_to_quantity() {
        let schema = resolve("step_count");
        assert_eq!(schema.shape, MetricShape::Quantity);
        assert_eq!(schema.collection, "step_count");
    }

    #[test]
    fn test_fixed_kind_lookup_is_exact_match() {
        // A near-miss spelling is a different kind, not a fixed one
        let schema = resolve("Heart Rate");
        assert_eq!(schema.shape, MetricShape::Quantity);
        assert_eq!(schema.collection, "heart_rate");
    }

    #[test]
    fn test_collection_name_derivation() {
        assert_eq!(collection_for_kind("VO2 Max"), "vo2_max");
        assert_eq!(collection_for_kind("  walking+running distance "), "walking_running_distance");
        assert_eq!(collection_for_kind("!!!"), "unclassified");
    }
}
