// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courier CRUD handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use despacho_core::{Courier, DespachoError};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for POST /api/entregadores.
#[derive(Debug, Deserialize)]
pub struct CreateCourierRequest {
    pub nome: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub veiculo: Option<String>,
    #[serde(default)]
    pub rota: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default, rename = "fotoUrl")]
    pub foto_url: Option<String>,
}

/// Request body for PUT /api/entregadores/{id}. The owning account is not
/// reassignable.
#[derive(Debug, Deserialize)]
pub struct UpdateCourierRequest {
    pub nome: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub veiculo: Option<String>,
    #[serde(default)]
    pub rota: Option<String>,
    #[serde(default, rename = "fotoUrl")]
    pub foto_url: Option<String>,
}

/// POST /api/entregadores
pub async fn post_courier(
    State(state): State<GatewayState>,
    Json(body): Json<CreateCourierRequest>,
) -> Result<Response, ApiError> {
    let (Some(name), Some(account_id)) = (body.nome, body.user_id) else {
        return Err(ApiError(DespachoError::Validation(
            "Dados incompletos.".to_string(),
        )));
    };
    if name.is_empty() || account_id.is_empty() {
        return Err(ApiError(DespachoError::Validation(
            "Dados incompletos.".to_string(),
        )));
    }

    let courier = Courier {
        id: Uuid::new_v4().to_string(),
        name,
        phone: body.telefone,
        vehicle: body.veiculo,
        route: body.rota,
        photo_url: body.foto_url,
        account_id,
    };
    state.couriers.add_courier(&courier).await?;
    Ok((StatusCode::CREATED, Json(courier)).into_response())
}

/// PUT /api/entregadores/{id}
pub async fn put_courier(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateCourierRequest>,
) -> Result<Json<Courier>, ApiError> {
    let existing = state
        .couriers
        .get_courier(&id)
        .await?
        .ok_or(DespachoError::NotFound {
            entity: "courier",
            id: id.clone(),
        })?;

    let updated = Courier {
        id: existing.id,
        name: body.nome.unwrap_or(existing.name),
        phone: body.telefone,
        vehicle: body.veiculo,
        route: body.rota,
        photo_url: body.foto_url,
        account_id: existing.account_id,
    };
    state.couriers.update_courier(&updated).await?;
    Ok(Json(updated))
}

/// DELETE /api/entregadores/{id}
pub async fn delete_courier(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.couriers.delete_courier(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
