// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Metrics (per-kind collections, bulk idempotent upserts)
//! - Workouts (keyed by workout_id)
//! - Workout routes (GPS point sequences, stored apart from workouts)
//!
//! All writes are upserts keyed by a document ID derived from the record's
//! natural identity, so re-ingesting an identity overwrites the prior
//! document. No read-before-write is performed; last-write-wins on
//! identity collision is intended.

use crate::db::collections;
use crate::error::AppError;
use crate::models::workout::{NormalizedRoute, NormalizedWorkout};
use crate::models::{NormalizedMetric, StoredMetric};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};

/// Upper bound on in-flight writes within one bulk upsert.
const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Document ID for a metric: (source, timestamp) within its collection.
fn metric_doc_id(record: &NormalizedMetric) -> String {
    format!(
        "{}_{}",
        urlencoding::encode(&record.source),
        record.timestamp.timestamp_millis()
    )
}

/// Document ID for a workout or its route: the external workout identifier.
fn workout_doc_id(workout_id: &str) -> String {
    urlencoding::encode(workout_id).into_owned()
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // With the emulator, use an unauthenticated connection to avoid
        // local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Metric Operations ───────────────────────────────────────

    /// Bulk-upsert one kind's normalized metrics into its collection.
    ///
    /// Firestore has no multi-document bulk primitive, so the bulk
    /// operation is a bounded concurrent fan-out; any write error fails
    /// the whole kind group. Returns the number of records written.
    pub async fn bulk_upsert_metrics(
        &self,
        collection: &str,
        records: &[NormalizedMetric],
    ) -> Result<usize, AppError> {
        let client = self.get_client()?;
        let collection = collection.to_string();

        stream::iter(records.to_vec())
            .map(|record| {
                let collection = collection.clone();
                async move {
                    let doc_id = metric_doc_id(&record);

                    let _: () = client
                        .fluent()
                        .update()
                        .in_col(&collection)
                        .document_id(&doc_id)
                        .object(&record)
                        .execute()
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;

                    Ok::<_, AppError>(())
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(records.len())
    }

    /// Get a kind's stored metrics, newest first, with optional time range.
    pub async fn get_metrics(
        &self,
        collection: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: u32,
    ) -> Result<Vec<StoredMetric>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| {
                q.for_all([
                    from.and_then(|f| {
                        q.field("timestamp")
                            .greater_than_or_equal(format_utc_rfc3339(f))
                    }),
                    to.and_then(|t| {
                        q.field("timestamp")
                            .less_than_or_equal(format_utc_rfc3339(t))
                    }),
                ])
            })
            .order_by([(
                "timestamp",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Workout Operations ──────────────────────────────────────

    /// Bulk-upsert normalized workouts, keyed by workout_id.
    pub async fn bulk_upsert_workouts(
        &self,
        workouts: &[NormalizedWorkout],
    ) -> Result<usize, AppError> {
        let client = self.get_client()?;

        stream::iter(workouts.to_vec())
            .map(|workout| async move {
                let doc_id = workout_doc_id(&workout.workout_id);

                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::WORKOUTS)
                    .document_id(&doc_id)
                    .object(&workout)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                Ok::<_, AppError>(())
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(workouts.len())
    }

    /// Bulk-upsert workout routes, keyed by the owning workout_id.
    pub async fn bulk_upsert_routes(
        &self,
        routes: &[NormalizedRoute],
    ) -> Result<usize, AppError> {
        let client = self.get_client()?;

        stream::iter(routes.to_vec())
            .map(|route| async move {
                let doc_id = workout_doc_id(&route.workout_id);

                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collections::WORKOUT_ROUTES)
                    .document_id(&doc_id)
                    .object(&route)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                Ok::<_, AppError>(())
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(routes.len())
    }

    /// Get stored workouts, newest first, with optional start-time range.
    pub async fn get_workouts(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: u32,
    ) -> Result<Vec<NormalizedWorkout>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUTS)
            .filter(move |q| {
                q.for_all([
                    from.and_then(|f| {
                        q.field("start").greater_than_or_equal(format_utc_rfc3339(f))
                    }),
                    to.and_then(|t| q.field("start").less_than_or_equal(format_utc_rfc3339(t))),
                ])
            })
            .order_by([("start", firestore::FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the route for one workout, if it has one.
    pub async fn get_route(&self, workout_id: &str) -> Result<Option<NormalizedRoute>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WORKOUT_ROUTES)
            .obj()
            .one(&workout_doc_id(workout_id))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metric::{MetricValue, QuantityValue};

    #[test]
    fn test_metric_doc_id_is_stable_per_identity() {
        let record = NormalizedMetric {
            source: "Apple Watch".to_string(),
            timestamp: chrono::DateTime::from_timestamp_millis(1_705_300_000_000).unwrap(),
            value: MetricValue::Quantity(QuantityValue {
                qty: Some(1.0),
                units: "count".to_string(),
                ..Default::default()
            }),
        };

        let id = metric_doc_id(&record);
        assert_eq!(id, "Apple%20Watch_1705300000000");
        // Identical identity, different value: same document
        let mut replayed = record.clone();
        replayed.value = MetricValue::Quantity(QuantityValue {
            qty: Some(2.0),
            units: "count".to_string(),
            ..Default::default()
        });
        assert_eq!(metric_doc_id(&replayed), id);
    }

    #[test]
    fn test_workout_doc_id_sanitizes_separators() {
        assert_eq!(workout_doc_id("a/b c"), "a%2Fb%20c");
    }
}
