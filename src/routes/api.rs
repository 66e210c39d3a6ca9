// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Query routes for stored metrics and workouts.

use crate::error::Result;
use crate::models::workout::{NormalizedRoute, NormalizedWorkout};
use crate::models::StoredMetric;
use crate::services::kinds;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query routes (require the read-scoped API key).
/// The auth middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/metrics/{kind}", get(get_metrics))
        .route("/api/workouts", get(get_workouts))
        .route("/api/workouts/{id}/route", get(get_workout_route))
}

const MAX_LIMIT: u32 = 1000;

fn default_limit() -> u32 {
    100
}

#[derive(Deserialize)]
struct RangeQuery {
    /// Lower bound on the record timestamp (RFC 3339, inclusive)
    from: Option<String>,
    /// Upper bound on the record timestamp (RFC 3339, inclusive)
    to: Option<String>,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn parse_range_bound(
    name: &str,
    raw: Option<&str>,
) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    raw.map(|value| {
        chrono::DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .map_err(|_| {
                crate::error::AppError::BadRequest(format!(
                    "Invalid '{}' parameter: must be RFC3339 datetime",
                    name
                ))
            })
    })
    .transpose()
}

// ─── Metrics ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MetricsResponse {
    pub kind: String,
    pub total: u32,
    pub records: Vec<StoredMetric>,
}

/// Get stored records for one metric kind, newest first.
async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<MetricsResponse>> {
    let from = parse_range_bound("from", params.from.as_deref())?;
    let to = parse_range_bound("to", params.to.as_deref())?;
    let limit = params.limit.min(MAX_LIMIT);

    let schema = kinds::resolve(&kind);
    tracing::debug!(
        kind = %kind,
        collection = %schema.collection,
        from = ?params.from,
        to = ?params.to,
        "Fetching metrics"
    );

    let records = state
        .db
        .get_metrics(&schema.collection, from, to, limit)
        .await?;

    Ok(Json(MetricsResponse {
        kind,
        total: records.len() as u32,
        records,
    }))
}

// ─── Workouts ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct WorkoutsResponse {
    pub total: u32,
    pub workouts: Vec<NormalizedWorkout>,
}

/// Get stored workouts, newest first, filtered by start time.
async fn get_workouts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<WorkoutsResponse>> {
    let from = parse_range_bound("from", params.from.as_deref())?;
    let to = parse_range_bound("to", params.to.as_deref())?;
    let limit = params.limit.min(MAX_LIMIT);

    let workouts = state.db.get_workouts(from, to, limit).await?;

    Ok(Json(WorkoutsResponse {
        total: workouts.len() as u32,
        workouts,
    }))
}

/// Get the GPS route for one workout.
async fn get_workout_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NormalizedRoute>> {
    let route = state.db.get_route(&id).await?.ok_or_else(|| {
        crate::error::AppError::NotFound(format!("No route for workout {}", id))
    })?;

    Ok(Json(route))
}
