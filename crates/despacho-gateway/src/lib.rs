// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API gateway for the Despacho dispatch service.
//!
//! Axum REST surface over the dispatch engine and the record stores. Route
//! paths, request/response field names, and error messages stay compatible
//! with the legacy manager frontend (Portuguese, camelCase).

pub mod couriers;
pub mod dashboard;
pub mod error;
pub mod handlers;
pub mod journeys;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, start_server, GatewayState, ServerConfig};
