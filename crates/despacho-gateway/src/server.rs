// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::CorsLayer;

use despacho_core::traits::{CourierStore, DeliveryStore, JourneyStore, NotificationChannel};
use despacho_core::DespachoError;
use despacho_engine::DispatchEngine;

use crate::{couriers, dashboard, handlers, journeys};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<DispatchEngine>,
    pub couriers: Arc<dyn CourierStore>,
    pub journeys: Arc<dyn JourneyStore>,
    pub deliveries: Arc<dyn DeliveryStore>,
    pub channel: Arc<dyn NotificationChannel>,
}

/// Gateway server configuration (mirrors ServerConfig from despacho-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the full route table. Exposed separately so integration tests can
/// drive the router without binding a socket.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/api/entregas", post(handlers::post_delivery))
        .route(
            "/api/entregas/{id}/status",
            patch(handlers::patch_delivery_status),
        )
        .route("/api/webhook/telegram", post(handlers::post_webhook))
        .route("/api/dados", get(dashboard::get_dados))
        .route("/api/operacao/{user_id}", get(dashboard::get_operacao))
        .route("/api/kpis/{user_id}", get(dashboard::get_kpis))
        .route("/api/entregadores", post(couriers::post_courier))
        .route(
            "/api/entregadores/{id}",
            put(couriers::put_courier).delete(couriers::delete_courier),
        )
        .route("/api/jornadas", post(journeys::post_journey))
        .route("/api/jornadas/{id}", delete(journeys::delete_journey))
        .route(
            "/api/jornadas/{id}/finalizar",
            post(journeys::post_finalize),
        )
        .route(
            "/api/jornadas/historico/{user_id}",
            get(journeys::get_history),
        )
        .route("/api/jornadas/{id}/detalhes", get(journeys::get_details))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), DespachoError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DespachoError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| DespachoError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }
}
