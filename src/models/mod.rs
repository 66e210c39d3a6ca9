// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod metric;
pub mod outcome;
pub mod workout;

pub use metric::{MetricValue, NormalizedMetric, RawMetricPayload, RawRecord, StoredMetric};
pub use outcome::{GroupOutcome, IngestionOutcome};
pub use workout::{NormalizedRoute, NormalizedWorkout, RawWorkout};
