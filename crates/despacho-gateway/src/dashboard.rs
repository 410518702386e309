// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manager dashboard queries: full data dump, live operation view, KPIs.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use despacho_core::{Courier, Delivery, DeliveryStatus};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Response body for GET /api/dados.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub entregadores: Vec<Courier>,
    pub entregas: Vec<Delivery>,
}

/// Response body for GET /api/operacao/{userId}.
#[derive(Debug, Serialize)]
pub struct OperationResponse {
    #[serde(rename = "entregadoresAtivos")]
    pub active_couriers: Vec<Courier>,
    #[serde(rename = "entregasAtivas")]
    pub active_deliveries: Vec<Delivery>,
}

/// Response body for GET /api/kpis/{userId}.
#[derive(Debug, Serialize)]
pub struct KpisResponse {
    #[serde(rename = "totalEntregadores")]
    pub total_couriers: usize,
    #[serde(rename = "valorRecebido")]
    pub amount_received: f64,
    #[serde(rename = "porcentagemEntregasConcluidas")]
    pub completion_percentage: u32,
    #[serde(rename = "tempoMedioEntrega")]
    pub average_delivery_time: String,
}

/// GET /api/dados
pub async fn get_dados(State(state): State<GatewayState>) -> Result<Json<DataResponse>, ApiError> {
    let couriers = state.couriers.list_couriers().await?;
    let deliveries = state.deliveries.list_deliveries().await?;
    Ok(Json(DataResponse {
        entregadores: couriers,
        entregas: deliveries,
    }))
}

/// GET /api/operacao/{userId}
///
/// Couriers and deliveries of the account's active journey; empty lists
/// when no journey is active.
pub async fn get_operacao(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<OperationResponse>, ApiError> {
    let Some(journey) = state.journeys.find_active(&user_id).await?.into_iter().next() else {
        return Ok(Json(OperationResponse {
            active_couriers: Vec::new(),
            active_deliveries: Vec::new(),
        }));
    };

    let couriers = state.couriers.get_couriers(&journey.courier_ids).await?;
    let deliveries = state.deliveries.list_for_journey(&journey.id).await?;
    Ok(Json(OperationResponse {
        active_couriers: couriers,
        active_deliveries: deliveries,
    }))
}

/// GET /api/kpis/{userId}
///
/// Aggregates over the account's most recently finalized journey. With no
/// finalized journey the numeric KPIs are zero and the average time is "—".
pub async fn get_kpis(
    State(state): State<GatewayState>,
    Path(user_id): Path<String>,
) -> Result<Json<KpisResponse>, ApiError> {
    let total_couriers = state.couriers.list_couriers_for_account(&user_id).await?.len();

    let Some(journey) = state.journeys.latest_finalized(&user_id).await? else {
        return Ok(Json(KpisResponse {
            total_couriers,
            amount_received: 0.0,
            completion_percentage: 0,
            average_delivery_time: "—".to_string(),
        }));
    };

    let deliveries = state.deliveries.list_for_journey(&journey.id).await?;
    Ok(Json(compute_kpis(total_couriers, &deliveries)))
}

fn compute_kpis(total_couriers: usize, deliveries: &[Delivery]) -> KpisResponse {
    let total = deliveries.len();
    let mut completed = 0usize;
    let mut amount_received = 0.0f64;
    let mut transit_minutes = Vec::new();

    for delivery in deliveries {
        if delivery.status == DeliveryStatus::Completed {
            completed += 1;
            amount_received += delivery.amount_to_collect;
            if let Some(updated_at) = delivery.updated_at {
                let minutes =
                    (updated_at - delivery.created_at).num_milliseconds() as f64 / 60_000.0;
                transit_minutes.push(minutes);
            }
        }
    }

    let completion_percentage = if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };

    let average_delivery_time = if transit_minutes.is_empty() {
        "—".to_string()
    } else {
        let mean = (transit_minutes.iter().sum::<f64>() / transit_minutes.len() as f64).round()
            as i64;
        if mean < 60 {
            format!("{mean} min")
        } else {
            format!("{}h {}min", mean / 60, mean % 60)
        }
    };

    KpisResponse {
        total_couriers,
        amount_received,
        completion_percentage,
        average_delivery_time,
    }
}
