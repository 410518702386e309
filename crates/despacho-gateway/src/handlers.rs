// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery, webhook, and health handlers.

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use despacho_core::traits::InboundUpdate;
use despacho_core::{DeliveryStatus, DespachoError, HealthStatus};
use despacho_engine::{NewDelivery, TransitionOrigin};
use despacho_telegram::webhook::parse_update;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for POST /api/entregas.
#[derive(Debug, Deserialize)]
pub struct CreateDeliveryRequest {
    pub cliente: Option<String>,
    pub endereco: Option<String>,
    pub pedido: Option<String>,
    #[serde(rename = "entregadorId")]
    pub entregador_id: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default, rename = "valorCobrar")]
    pub valor_cobrar: Option<f64>,
}

/// Request body for PATCH /api/entregas/{id}/status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub channel: String,
}

fn required(field: Option<String>) -> Result<String, ApiError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError(DespachoError::Validation(
            "Dados incompletos.".to_string(),
        ))),
    }
}

/// POST /api/entregas
///
/// Creates a delivery against the courier's active journey and notifies the
/// courier. Returns the stored record, id included.
pub async fn post_delivery(
    State(state): State<GatewayState>,
    Json(body): Json<CreateDeliveryRequest>,
) -> Result<Response, ApiError> {
    let new = NewDelivery {
        client_name: required(body.cliente)?,
        address: required(body.endereco)?,
        order_label: required(body.pedido)?,
        courier_id: required(body.entregador_id)?,
        kind: body.tipo,
        amount_to_collect: body.valor_cobrar,
    };
    let delivery = state.engine.create_delivery(new).await?;
    Ok((StatusCode::CREATED, Json(delivery)).into_response())
}

/// PATCH /api/entregas/{id}/status
///
/// Manager override: applies any status with no state-machine validation
/// and appends a journey event.
pub async fn patch_delivery_status(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(status) = body.status else {
        return Err(ApiError(DespachoError::Validation(
            "Status é obrigatório.".to_string(),
        )));
    };
    let status = DeliveryStatus::from_str(&status)
        .map_err(|_| DespachoError::Validation("Status inválido.".to_string()))?;

    state
        .engine
        .apply_transition(&id, status, false, TransitionOrigin::Manager)
        .await?;
    Ok(Json(MessageResponse {
        message: "Status atualizado com sucesso.".to_string(),
    }))
}

/// POST /api/webhook/telegram
///
/// Receives raw Telegram updates. Unrecognized payloads and non-storage
/// processing failures are acknowledged with 200 so Telegram does not
/// retry; storage failures surface as 500.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<StatusCode, ApiError> {
    let Some(update) = parse_update(&payload) else {
        return Ok(StatusCode::OK);
    };

    let result = match update {
        InboundUpdate::Interaction {
            token,
            target,
            handle,
            original_text,
        } => {
            state
                .engine
                .handle_interaction(&token, &target, &handle, &original_text)
                .await
        }
        InboundUpdate::Reply { sender, body } => state.engine.handle_reply(&sender, &body).await,
    };

    match result {
        Ok(()) => Ok(StatusCode::OK),
        Err(err @ DespachoError::Storage { .. }) => Err(ApiError(err)),
        Err(err) => {
            // Conflicting or stale updates are the courier's problem, not
            // Telegram's; acknowledge so the update is not redelivered.
            warn!(error = %err, "webhook update not applied");
            Ok(StatusCode::OK)
        }
    }
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let channel = match state.channel.health_check().await {
        Ok(HealthStatus::Healthy) => "healthy".to_string(),
        Ok(HealthStatus::Degraded(reason)) => format!("degraded: {reason}"),
        Ok(HealthStatus::Unhealthy(reason)) => format!("unhealthy: {reason}"),
        Err(e) => format!("unhealthy: {e}"),
    };
    Json(HealthResponse {
        status: "ok".to_string(),
        channel,
    })
}
