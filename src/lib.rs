// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Health-Sync: ingest personal health-tracker exports into Firestore.
//!
//! This crate provides the backend API that receives metric and workout
//! batches pushed by a mobile export tool, normalizes their heterogeneous
//! shapes into typed records, and upserts them idempotently per kind.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::IngestService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub ingest: IngestService,
}
