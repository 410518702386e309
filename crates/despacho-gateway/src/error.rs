// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error-to-response mapping.
//!
//! Domain errors carry internal detail; the HTTP surface exposes only the
//! legacy frontend's Portuguese messages. Internal errors are logged with
//! full context and surfaced as an opaque 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use despacho_core::DespachoError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper turning a [`DespachoError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub DespachoError);

impl From<DespachoError> for ApiError {
    fn from(err: DespachoError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DespachoError::NotFound { entity, .. } => {
                let message = match *entity {
                    "courier" => "Entregador não encontrado.",
                    "delivery" => "Entrega não encontrada.",
                    "journey" => "Jornada não encontrada.",
                    _ => "Recurso não encontrado.",
                };
                (StatusCode::NOT_FOUND, message.to_string())
            }
            DespachoError::NoActiveJourney { .. } => {
                (StatusCode::BAD_REQUEST, "Nenhuma jornada ativa.".to_string())
            }
            DespachoError::Validation(message) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            DespachoError::ActiveJourneyExists { .. } => (
                StatusCode::CONFLICT,
                "Já existe uma jornada ativa.".to_string(),
            ),
            DespachoError::InvalidTransition { .. } => (
                StatusCode::CONFLICT,
                "Entrega já está em um status final.".to_string(),
            ),
            err => {
                error!(error = %err, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno do servidor.".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: DespachoError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn status_mapping_matches_legacy_api() {
        assert_eq!(
            status_of(DespachoError::NotFound {
                entity: "courier",
                id: "x".into()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(DespachoError::NoActiveJourney {
                account_id: "u1".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DespachoError::Validation("Dados incompletos.".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DespachoError::ActiveJourneyExists {
                account_id: "u1".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DespachoError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
