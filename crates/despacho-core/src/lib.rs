// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Despacho dispatch service.
//!
//! This crate provides the error taxonomy, domain types (couriers, journeys,
//! deliveries, journey events), and the adapter traits the dispatch engine
//! depends on. Concrete backends (SQLite storage, the Telegram channel)
//! implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DespachoError;
pub use types::{
    Courier, Delivery, DeliveryStatus, EventKind, HealthStatus, Journey, JourneyEvent,
    JourneyStatus, JourneySummary, MessageHandle, NewJourneyEvent,
};

pub use traits::{
    CourierStore, DeliveryStore, InboundUpdate, JourneyStore, NotificationAction,
    NotificationChannel, OutboundNotification,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct() {
        let _config = DespachoError::Config("test".into());
        let _not_found = DespachoError::NotFound {
            entity: "delivery",
            id: "d-1".into(),
        };
        let _no_journey = DespachoError::NoActiveJourney {
            account_id: "u1".into(),
        };
        let _validation = DespachoError::Validation("test".into());
        let _conflict = DespachoError::ActiveJourneyExists {
            account_id: "u1".into(),
        };
        let _transition = DespachoError::InvalidTransition {
            delivery_id: "d-1".into(),
            current: DeliveryStatus::Completed,
        };
        let _storage = DespachoError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = DespachoError::Channel {
            message: "test".into(),
            source: None,
        };
        let _internal = DespachoError::Internal("test".into());
    }

    #[test]
    fn not_found_renders_entity_and_id() {
        let err = DespachoError::NotFound {
            entity: "courier",
            id: "abc".into(),
        };
        assert_eq!(err.to_string(), "courier not found: abc");
    }
}
