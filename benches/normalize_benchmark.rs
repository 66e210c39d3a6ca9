use criterion::{black_box, criterion_group, criterion_main, Criterion};
use health_sync::models::RawMetricPayload;
use health_sync::models::RawWorkout;
use health_sync::services::{metrics, workouts};
use serde_json::json;

fn heart_rate_payload(samples: u64) -> RawMetricPayload {
    let data: Vec<_> = (0..samples)
        .map(|i| {
            json!({
                "date": 1_705_300_000_000u64 + i * 60_000,
                "Min": 55 + (i % 20),
                "Avg": 70 + (i % 30),
                "Max": 120 + (i % 60),
                "source": "Watch",
            })
        })
        .collect();

    serde_json::from_value(json!({
        "name": "heart_rate",
        "units": "bpm",
        "data": data,
    }))
    .expect("Failed to build heart-rate payload")
}

fn generic_payload(records: u64) -> RawMetricPayload {
    // String dates exercise the slower text-parsing path
    let data: Vec<_> = (0..records)
        .map(|i| {
            json!({
                "date": format!("2024-01-{:02} 08:30:00", 1 + (i % 28)),
                "qty": 4000 + i,
                "source": "Phone",
            })
        })
        .collect();

    serde_json::from_value(json!({
        "name": "step_count",
        "units": "count",
        "data": data,
    }))
    .expect("Failed to build step-count payload")
}

fn workout_with_series(samples: u64) -> RawWorkout {
    let series: Vec<_> = (0..samples)
        .map(|i| {
            json!({
                "date": 1_705_300_000_000u64 + i * 1_000,
                "Min": 55 + (i % 20),
                "Avg": 70 + (i % 30),
                "Max": 120 + (i % 60),
            })
        })
        .collect();
    let route: Vec<_> = (0..samples)
        .map(|i| {
            json!({
                "lat": 37.4 + (i as f64) * 1e-5,
                "lon": -122.2 - (i as f64) * 1e-5,
                "timestamp": 1_705_300_000_000u64 + i * 1_000,
            })
        })
        .collect();

    serde_json::from_value(json!({
        "id": "bench-workout",
        "name": "Long Run",
        "start": 1_705_300_000_000u64,
        "duration": 5400.0,
        "heartRateData": series,
        "route": route,
    }))
    .expect("Failed to build workout payload")
}

fn benchmark_normalization(c: &mut Criterion) {
    let heart_rate = heart_rate_payload(5_000);
    let steps = generic_payload(5_000);
    let workout = workout_with_series(3_600);

    let mut group = c.benchmark_group("normalization");

    group.bench_function("heart_rate_5k_epoch_dates", |b| {
        b.iter(|| metrics::normalize_payload(black_box(&heart_rate)))
    });

    group.bench_function("step_count_5k_text_dates", |b| {
        b.iter(|| metrics::normalize_payload(black_box(&steps)))
    });

    group.bench_function("workout_1h_series_with_route", |b| {
        b.iter(|| workouts::normalize_workout(black_box(&workout)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_normalization);
criterion_main!(benches);
