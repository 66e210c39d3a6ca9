// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record normalizer: raw metric payloads to typed metric records.
//!
//! Pure functions, no I/O. Malformed numeric fields are coerced or dropped
//! per-field; a record is only skipped outright when its timestamp cannot
//! be resolved (or a specially-shaped kind is missing its defining values).

use crate::models::metric::{
    MetricValue, NormalizedMetric, NumberInput, QuantityValue, RawMetricPayload, RawRecord,
    SleepStages,
};
use crate::services::kinds::{self, MetricShape};
use crate::time_utils::{resolve_timestamp, TimestampInput};

/// Source recorded for records that don't name one.
const UNKNOWN_SOURCE: &str = "unknown";

/// Normalize one raw metric payload into zero or more typed records.
pub fn normalize_payload(payload: &RawMetricPayload) -> Vec<NormalizedMetric> {
    let schema = kinds::resolve(&payload.name);
    payload
        .data
        .iter()
        .filter_map(|record| normalize_record(payload, schema.shape, record))
        .collect()
}

fn normalize_record(
    payload: &RawMetricPayload,
    shape: MetricShape,
    record: &RawRecord,
) -> Option<NormalizedMetric> {
    let timestamp = match record.date.as_ref().map(resolve_timestamp) {
        Some(Some(ts)) => ts,
        _ => {
            tracing::warn!(
                kind = %payload.name,
                date = ?record.date,
                "Skipping metric record with unresolvable date"
            );
            return None;
        }
    };

    let value = match shape {
        MetricShape::BloodPressure => {
            // Both sub-values are the point of a blood pressure reading
            let (Some(systolic), Some(diastolic)) = (num(&record.systolic), num(&record.diastolic))
            else {
                tracing::warn!(kind = %payload.name, "Skipping blood pressure record missing systolic/diastolic");
                return None;
            };
            MetricValue::BloodPressure {
                systolic,
                diastolic,
            }
        }
        MetricShape::HeartRate => MetricValue::HeartRate {
            min: num(&record.min),
            avg: num(&record.avg),
            max: num(&record.max),
        },
        MetricShape::Sleep => MetricValue::Sleep(SleepStages {
            asleep: num(&record.asleep),
            core: num(&record.core),
            deep: num(&record.deep),
            rem: num(&record.rem),
            awake: num(&record.awake),
            in_bed: num(&record.in_bed),
            sleep_start: resolve_optional(&record.sleep_start),
            sleep_end: resolve_optional(&record.sleep_end),
        }),
        MetricShape::Quantity => MetricValue::Quantity(QuantityValue {
            qty: num(&record.qty),
            units: record
                .units
                .clone()
                .or_else(|| payload.units.clone())
                .unwrap_or_default(),
            metadata: scrub_metadata(&record.extra),
        }),
    };

    Some(NormalizedMetric {
        source: record
            .source
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        timestamp,
        value,
    })
}

fn num(input: &Option<NumberInput>) -> Option<f64> {
    input.as_ref().and_then(NumberInput::as_f64)
}

fn resolve_optional(input: &Option<TimestampInput>) -> Option<chrono::DateTime<chrono::Utc>> {
    input.as_ref().and_then(resolve_timestamp)
}

/// Metadata pass-through for generic kinds, minus nulls.
fn scrub_metadata(
    extra: &serde_json::Map<String, serde_json::Value>,
) -> serde_json::Map<String, serde_json::Value> {
    extra
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::format_utc_rfc3339;
    use serde_json::json;

    fn payload(name: &str, units: &str, data: serde_json::Value) -> RawMetricPayload {
        serde_json::from_value(json!({
            "name": name,
            "units": units,
            "data": data,
        }))
        .unwrap()
    }

    #[test]
    fn test_generic_kind_maps_one_to_one() {
        let payload = payload(
            "step_count",
            "count",
            json!([
                {"date": "2024-01-15 08:30:00", "qty": 4200, "source": "Phone"},
                {"date": "2024-01-16 08:30:00", "qty": 5100, "source": "Phone"},
            ]),
        );

        let records = normalize_payload(&payload);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, "Phone");
        assert_eq!(
            format_utc_rfc3339(records[0].timestamp),
            "2024-01-15T08:30:00Z"
        );
        match &records[0].value {
            MetricValue::Quantity(q) => {
                assert_eq!(q.qty, Some(4200.0));
                assert_eq!(q.units, "count");
            }
            other => panic!("expected quantity shape, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_date_drops_only_that_record() {
        let payload = payload(
            "step_count",
            "count",
            json!([
                {"date": "not-a-date", "qty": 1},
                {"date": "2024-01-15", "qty": 2},
            ]),
        );

        let records = normalize_payload(&payload);
        assert_eq!(records.len(), 1);
        match &records[0].value {
            MetricValue::Quantity(q) => assert_eq!(q.qty, Some(2.0)),
            other => panic!("expected quantity shape, got {:?}", other),
        }
    }

    #[test]
    fn test_qty_coerced_from_numeric_string() {
        let payload = payload(
            "body_mass",
            "kg",
            json!([{"date": "2024-01-15", "qty": "72.5", "source": "Scale"}]),
        );

        let records = normalize_payload(&payload);
        match &records[0].value {
            MetricValue::Quantity(q) => assert_eq!(q.qty, Some(72.5)),
            other => panic!("expected quantity shape, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_qty_dropped_per_field_not_per_record() {
        let payload = payload(
            "body_mass",
            "kg",
            json!([{"date": "2024-01-15", "qty": "heavy"}]),
        );

        let records = normalize_payload(&payload);
        assert_eq!(records.len(), 1);
        match &records[0].value {
            MetricValue::Quantity(q) => assert_eq!(q.qty, None),
            other => panic!("expected quantity shape, got {:?}", other),
        }
    }

    #[test]
    fn test_blood_pressure_splits_into_sub_values() {
        let payload = payload(
            "blood_pressure",
            "mmHg",
            json!([{"date": "2024-01-15", "systolic": 120, "diastolic": 80, "source": "Cuff"}]),
        );

        let records = normalize_payload(&payload);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].value,
            MetricValue::BloodPressure {
                systolic: 120.0,
                diastolic: 80.0
            }
        );
    }

    #[test]
    fn test_blood_pressure_missing_sub_value_skips_record() {
        let payload = payload(
            "blood_pressure",
            "mmHg",
            json!([{"date": "2024-01-15", "systolic": 120}]),
        );

        assert!(normalize_payload(&payload).is_empty());
    }

    #[test]
    fn test_heart_rate_carries_min_avg_max() {
        let payload = payload(
            "heart_rate",
            "bpm",
            json!([{"date": "2024-01-15", "Min": 58, "Avg": 72, "Max": 131, "source": "Watch"}]),
        );

        let records = normalize_payload(&payload);
        assert_eq!(
            records[0].value,
            MetricValue::HeartRate {
                min: Some(58.0),
                avg: Some(72.0),
                max: Some(131.0)
            }
        );
    }

    #[test]
    fn test_sleep_splits_into_named_stages() {
        let payload = payload(
            "sleep_analysis",
            "hr",
            json!([{
                "date": "2024-01-15",
                "asleep": 7.4,
                "deep": 1.2,
                "rem": 1.8,
                "core": 4.4,
                "awake": 0.3,
                "inBed": 7.9,
                "sleepStart": "2024-01-14 23:10:00",
                "sleepEnd": "2024-01-15 06:50:00",
                "source": "Watch"
            }]),
        );

        let records = normalize_payload(&payload);
        match &records[0].value {
            MetricValue::Sleep(stages) => {
                assert_eq!(stages.asleep, Some(7.4));
                assert_eq!(stages.deep, Some(1.2));
                assert_eq!(stages.in_bed, Some(7.9));
                assert_eq!(
                    format_utc_rfc3339(stages.sleep_start.unwrap()),
                    "2024-01-14T23:10:00Z"
                );
            }
            other => panic!("expected sleep shape, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_source_defaults_to_unknown() {
        let payload = payload("step_count", "count", json!([{"date": "2024-01-15", "qty": 1}]));
        assert_eq!(normalize_payload(&payload)[0].source, "unknown");
    }

    #[test]
    fn test_generic_metadata_pass_through() {
        let payload = payload(
            "handwashing",
            "s",
            json!([{"date": "2024-01-15", "qty": 20, "value": "Complete", "skipped": null}]),
        );

        let records = normalize_payload(&payload);
        match &records[0].value {
            MetricValue::Quantity(q) => {
                assert_eq!(q.metadata.get("value"), Some(&json!("Complete")));
                // Nulls don't survive into storage
                assert!(q.metadata.get("skipped").is_none());
            }
            other => panic!("expected quantity shape, got {:?}", other),
        }
    }
}
