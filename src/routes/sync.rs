// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ingestion route for export pushes.

use crate::services::SyncData;
use crate::AppState;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Sync routes (require the write-scoped API key).
/// The auth middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/sync", post(sync))
}

/// Top-level error body for structurally invalid requests.
#[derive(Serialize)]
struct StructuralError {
    error: String,
    message: String,
}

fn structural_error(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(StructuralError {
            error: "invalid_payload".to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}

/// Ingest a batch of metrics and workouts.
///
/// A request missing the top-level `data` payload fails fast with a single
/// top-level error before any normalization runs. Everything else is
/// reported per group: 200 when all groups succeed, 207 on partial
/// success, 500 when every group fails.
async fn sync(State(state): State<Arc<AppState>>, Json(body): Json<serde_json::Value>) -> Response {
    let Some(data_value) = body.get("data") else {
        tracing::warn!("Sync request missing top-level 'data' payload");
        return structural_error("Missing top-level 'data' payload");
    };

    let data: SyncData = match serde_json::from_value(data_value.clone()) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, "Sync request payload failed to parse");
            return structural_error(format!("Malformed 'data' payload: {}", e));
        }
    };

    tracing::info!(
        metric_payloads = data.metrics.len(),
        workouts = data.workouts.len(),
        "Ingestion request received"
    );

    let outcome = state.ingest.ingest(data).await;

    let status = if outcome.all_succeeded() {
        StatusCode::OK
    } else if outcome.any_succeeded() {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(outcome)).into_response()
}
