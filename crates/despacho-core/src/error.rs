// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Despacho dispatch service.

use thiserror::Error;

use crate::types::DeliveryStatus;

/// The primary error type used across the store traits, the notification
/// channel, and the dispatch engine.
#[derive(Debug, Error)]
pub enum DespachoError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// A referenced entity (courier, journey, delivery) does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The courier's owning account has no journey with status "ativa".
    #[error("no active journey for account {account_id}")]
    NoActiveJourney { account_id: String },

    /// A request failed boundary validation (missing or malformed field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An active journey already exists for the account (at most one allowed).
    #[error("account {account_id} already has an active journey")]
    ActiveJourneyExists { account_id: String },

    /// An inbound-reply-driven transition was requested on a delivery that
    /// is no longer in transit. The manager-override path never raises this.
    #[error("delivery {delivery_id} cannot transition from {current}")]
    InvalidTransition {
        delivery_id: String,
        current: DeliveryStatus,
    },

    /// Record store errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Notification channel errors (send/edit failure, malformed target).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
