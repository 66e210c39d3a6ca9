// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod ingest;
pub mod kinds;
pub mod metrics;
pub mod workouts;

pub use ingest::{IngestService, SyncData};
pub use kinds::{KindSchema, MetricShape};
