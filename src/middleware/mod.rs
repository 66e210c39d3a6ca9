// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware for authentication and response hardening.

pub mod auth;
pub mod security;
