// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types for the Despacho dispatch service.
//!
//! Wire names stay compatible with the legacy HTTP API (Portuguese,
//! camelCase), so every entity carries explicit serde renames. Status
//! enums keep the legacy literals (`"Em Trânsito"`, `"Concluída"`,
//! `"Falhou"`) as their canonical serialized form; those same strings are
//! what the record store persists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A delivery agent, scoped to an owning account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Courier {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    #[serde(rename = "veiculo")]
    pub vehicle: Option<String>,
    #[serde(rename = "rota")]
    pub route: Option<String>,
    #[serde(rename = "fotoUrl")]
    pub photo_url: Option<String>,
    #[serde(rename = "userId")]
    pub account_id: String,
}

/// Journey lifecycle status. At most one `Active` journey may exist per
/// account at any time (enforced by query-before-create, not a constraint).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum JourneyStatus {
    #[serde(rename = "ativa")]
    #[strum(serialize = "ativa")]
    Active,
    #[serde(rename = "finalizada")]
    #[strum(serialize = "finalizada")]
    Finalized,
}

/// A courier work shift aggregating deliveries for an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journey {
    pub id: String,
    #[serde(rename = "userId")]
    pub account_id: String,
    pub status: JourneyStatus,
    #[serde(rename = "entregadoresIds")]
    pub courier_ids: Vec<String>,
    #[serde(rename = "dataInicio")]
    pub started_at: DateTime<Utc>,
    #[serde(rename = "dataFim")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(rename = "resumo")]
    pub summary: Option<JourneySummary>,
}

/// Terminal aggregate computed when a journey is finalized.
///
/// `success_rate` is a fixed-point string with exactly one fractional digit
/// (`"50.0"`, `"0.0"`) for wire compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySummary {
    #[serde(rename = "totalEntregas")]
    pub total: u32,
    #[serde(rename = "concluidas")]
    pub completed: u32,
    #[serde(rename = "falhas")]
    pub failed: u32,
    #[serde(rename = "taxaSucesso")]
    pub success_rate: String,
}

/// Category of an append-only journey event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum EventKind {
    #[serde(rename = "CRIACAO")]
    #[strum(serialize = "CRIACAO")]
    Creation,
    #[serde(rename = "STATUS")]
    #[strum(serialize = "STATUS")]
    StatusChange,
}

/// An append-only event in a journey's sub-log. Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyEvent {
    pub id: i64,
    #[serde(rename = "tipo")]
    pub kind: EventKind,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "entregaId")]
    pub delivery_id: String,
    #[serde(rename = "novoStatus")]
    pub new_status: Option<DeliveryStatus>,
    pub timestamp: DateTime<Utc>,
}

/// Fields for appending a journey event; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewJourneyEvent {
    pub kind: EventKind,
    pub text: String,
    pub delivery_id: String,
    pub new_status: Option<DeliveryStatus>,
}

/// Delivery state machine: `InTransit -> {Completed, Failed}`, both terminal.
///
/// Inbound-reply-driven transitions are validated against this machine; the
/// manager-override path may set any value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
pub enum DeliveryStatus {
    #[serde(rename = "Em Trânsito")]
    #[strum(serialize = "Em Trânsito")]
    InTransit,
    #[serde(rename = "Concluída")]
    #[strum(serialize = "Concluída")]
    Completed,
    #[serde(rename = "Falhou")]
    #[strum(serialize = "Falhou")]
    Failed,
}

impl DeliveryStatus {
    /// Whether this status is terminal (no further reply-driven transitions).
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryStatus::Completed | DeliveryStatus::Failed)
    }
}

/// A single order assigned to a courier within a journey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    #[serde(rename = "cliente")]
    pub client_name: String,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "pedido")]
    pub order_label: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "valorCobrar")]
    pub amount_to_collect: f64,
    pub status: DeliveryStatus,
    #[serde(rename = "requerAtencao")]
    pub requires_attention: bool,
    #[serde(rename = "entregadorId")]
    pub courier_id: String,
    #[serde(rename = "userId")]
    pub account_id: String,
    #[serde(rename = "jornadaId")]
    pub journey_id: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Opaque identifier returned by the notification channel for a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}
