// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journey handlers: start, delete, finalize, history, details.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use despacho_core::{Courier, Delivery, DespachoError, Journey, JourneyEvent, JourneySummary};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for POST /api/jornadas.
#[derive(Debug, Deserialize)]
pub struct StartJourneyRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default, rename = "entregadoresIds")]
    pub courier_ids: Vec<String>,
}

/// Response body for GET /api/jornadas/{id}/detalhes.
#[derive(Debug, Serialize)]
pub struct JourneyDetailsResponse {
    pub jornada: Journey,
    pub entregadores: Vec<Courier>,
    pub entregas: Vec<Delivery>,
    pub eventos: Vec<JourneyEvent>,
}

/// POST /api/jornadas
pub async fn post_journey(
    State(state): State<GatewayState>,
    Json(body): Json<StartJourneyRequest>,
) -> Result<Response, ApiError> {
    let Some(user_id) = body.user_id.filter(|id| !id.is_empty()) else {
        return Err(ApiError(DespachoError::Validation(
            "Dados incompletos.".to_string(),
        )));
    };
    let journey = state.engine.start_journey(&user_id, body.courier_ids).await?;
    Ok((StatusCode::CREATED, Json(journey)).into_response())
}

/// DELETE /api/jornadas/{id}
pub async fn delete_journey(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.journeys.delete_journey(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/jornadas/{id}/finalizar
pub async fn post_finalize(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<JourneySummary>, ApiError> {
    let summary = state.engine.finalize_journey(&id).await?;
    Ok(Json(summary))
}

/// GET /api/jornadas/historico/{userId}
///
/// Finalized journeys, most recently ended first.
pub async fn get_history(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Journey>>, ApiError> {
    let history = state.journeys.list_finalized(&user_id).await?;
    Ok(Json(history))
}

/// GET /api/jornadas/{id}/detalhes
///
/// The journey plus its participating couriers, member deliveries, and
/// event log (events in chronological order).
pub async fn get_details(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<JourneyDetailsResponse>, ApiError> {
    let journey = state
        .journeys
        .get_journey(&id)
        .await?
        .ok_or(DespachoError::NotFound {
            entity: "journey",
            id: id.clone(),
        })?;

    let couriers = state.couriers.get_couriers(&journey.courier_ids).await?;
    let deliveries = state.deliveries.list_for_journey(&id).await?;
    let events = state.journeys.list_events(&id).await?;

    Ok(Json(JourneyDetailsResponse {
        jornada: journey,
        entregadores: couriers,
        entregas: deliveries,
        eventos: events,
    }))
}
