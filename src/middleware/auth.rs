// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer API key authentication middleware.
//!
//! Two capability scopes: the write key gates the ingestion entry point,
//! the read key gates the query endpoints. Keys are compared in constant
//! time.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Middleware that requires the write-scoped API key.
pub async fn require_write_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&request, &state.config.write_api_key)?;
    Ok(next.run(request).await)
}

/// Middleware that requires the read-scoped API key.
pub async fn require_read_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&request, &state.config.read_api_key)?;
    Ok(next.run(request).await)
}

fn authorize(request: &Request, expected: &str) -> Result<(), AppError> {
    match bearer_token(request) {
        Some(token) if key_matches(token, expected) => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn key_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches() {
        assert!(key_matches("secret", "secret"));
        assert!(!key_matches("secret", "other"));
        // Length mismatch is a mismatch, not a panic
        assert!(!key_matches("s", "secret"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        let request = Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc123")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request), Some("abc123"));

        let no_scheme = Request::builder()
            .header(header::AUTHORIZATION, "abc123")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&no_scheme), None);
    }
}
