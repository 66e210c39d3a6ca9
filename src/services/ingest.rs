// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ingestion orchestration.
//!
//! Handles the core workflow:
//! 1. Normalize raw metric payloads and workouts (pure, no I/O)
//! 2. Group metrics by kind/collection
//! 3. Issue one bulk idempotent upsert per kind group
//! 4. Merge per-group outcomes into one response
//!
//! The metric and workout pipelines run as two concurrent tasks over
//! disjoint collections and are joined before the outcome is built; a
//! failure in one group never aborts or rolls back the other.

use crate::db::FirestoreDb;
use crate::models::outcome::{GroupOutcome, IngestionOutcome};
use crate::models::workout::{NormalizedRoute, NormalizedWorkout};
use crate::models::{NormalizedMetric, RawMetricPayload, RawWorkout};
use crate::services::{kinds, metrics, workouts};
use std::collections::BTreeMap;

/// Outcome message for a group that had nothing to write.
const NO_RECORDS: &str = "no records";

/// Orchestrates normalization and per-kind bulk upserts for one request.
#[derive(Clone)]
pub struct IngestService {
    db: FirestoreDb,
}

/// Parsed ingestion payload: the `data` object of a sync request.
#[derive(Debug, Default, serde::Deserialize)]
pub struct SyncData {
    #[serde(default)]
    pub metrics: Vec<RawMetricPayload>,
    #[serde(default)]
    pub workouts: Vec<RawWorkout>,
}

impl IngestService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Ingest one full sync payload.
    ///
    /// Never returns an error: every failure mode is folded into the
    /// per-group outcomes. Structural validation happens before this is
    /// called.
    pub async fn ingest(&self, data: SyncData) -> IngestionOutcome {
        let (metrics, workouts) = tokio::join!(
            self.ingest_metrics(&data.metrics),
            self.ingest_workouts(&data.workouts),
        );

        IngestionOutcome { metrics, workouts }
    }

    async fn ingest_metrics(&self, payloads: &[RawMetricPayload]) -> GroupOutcome {
        // Group normalized records by target collection. BTreeMap keeps
        // the per-kind write order (and outcome messages) deterministic.
        let mut groups: BTreeMap<String, Vec<NormalizedMetric>> = BTreeMap::new();
        for payload in payloads {
            let schema = kinds::resolve(&payload.name);
            let records = metrics::normalize_payload(payload);
            groups.entry(schema.collection).or_default().extend(records);
        }
        groups.retain(|_, records| !records.is_empty());

        if groups.is_empty() {
            return GroupOutcome::ok(NO_RECORDS);
        }

        // Each kind's bulk write is independent; a failed kind must not
        // abort the remaining kinds.
        let mut upserted = 0usize;
        let mut failures: Vec<String> = Vec::new();
        for (collection, records) in &groups {
            match self.db.bulk_upsert_metrics(collection, records).await {
                Ok(count) => {
                    tracing::debug!(collection = %collection, count, "Metric kind group upserted");
                    upserted += count;
                }
                Err(e) => {
                    tracing::error!(collection = %collection, error = %e, "Metric kind group write failed");
                    failures.push(format!("{}: {}", collection, e));
                }
            }
        }

        if failures.is_empty() {
            GroupOutcome::ok(format!("{} records upserted", upserted))
        } else {
            GroupOutcome::failed(failures.join("; "))
        }
    }

    async fn ingest_workouts(&self, raw: &[RawWorkout]) -> GroupOutcome {
        let mut normalized: Vec<NormalizedWorkout> = Vec::new();
        let mut routes: Vec<NormalizedRoute> = Vec::new();
        for raw_workout in raw {
            // Workouts without an identifier are excluded, not surfaced
            if let Some((workout, route)) = workouts::normalize_workout(raw_workout) {
                normalized.push(workout);
                routes.extend(route);
            }
        }

        if normalized.is_empty() {
            return GroupOutcome::ok(NO_RECORDS);
        }

        let mut failures: Vec<String> = Vec::new();

        let workout_count = match self.db.bulk_upsert_workouts(&normalized).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Workout bulk upsert failed");
                failures.push(format!("workouts: {}", e));
                0
            }
        };

        let route_count = if routes.is_empty() {
            0
        } else {
            match self.db.bulk_upsert_routes(&routes).await {
                Ok(count) => count,
                Err(e) => {
                    tracing::error!(error = %e, "Route bulk upsert failed");
                    failures.push(format!("routes: {}", e));
                    0
                }
            }
        };

        if failures.is_empty() {
            GroupOutcome::ok(format!(
                "{} workouts upserted ({} routes)",
                workout_count, route_count
            ))
        } else {
            GroupOutcome::failed(failures.join("; "))
        }
    }
}
