// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store traits for couriers, journeys, and deliveries.
//!
//! The store offers get/add/update/delete by key plus simple equality and
//! range queries, matching the document-database contract the service was
//! originally built against. Per-record updates are atomic; nothing spanning
//! two records is. The engine depends on these traits only, never on a
//! concrete backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DespachoError;
use crate::types::{
    Courier, Delivery, DeliveryStatus, Journey, JourneyEvent, JourneySummary, NewJourneyEvent,
};

/// CRUD access to courier records.
#[async_trait]
pub trait CourierStore: Send + Sync {
    async fn add_courier(&self, courier: &Courier) -> Result<(), DespachoError>;

    async fn get_courier(&self, id: &str) -> Result<Option<Courier>, DespachoError>;

    /// Full-record update; the caller supplies the merged record.
    async fn update_courier(&self, courier: &Courier) -> Result<(), DespachoError>;

    async fn delete_courier(&self, id: &str) -> Result<(), DespachoError>;

    /// All couriers, every account.
    async fn list_couriers(&self) -> Result<Vec<Courier>, DespachoError>;

    /// Couriers owned by one account.
    async fn list_couriers_for_account(
        &self,
        account_id: &str,
    ) -> Result<Vec<Courier>, DespachoError>;

    /// Couriers matching any of the given ids, in unspecified order.
    async fn get_couriers(&self, ids: &[String]) -> Result<Vec<Courier>, DespachoError>;
}

/// CRUD + query access to journey records and their append-only event log.
#[async_trait]
pub trait JourneyStore: Send + Sync {
    async fn add_journey(&self, journey: &Journey) -> Result<(), DespachoError>;

    async fn get_journey(&self, id: &str) -> Result<Option<Journey>, DespachoError>;

    /// Journeys with status "ativa" for the account, ordered by start time
    /// then id. Expected to hold at most one element; callers tie-break
    /// deterministically when the invariant is violated.
    async fn find_active(&self, account_id: &str) -> Result<Vec<Journey>, DespachoError>;

    /// Finalized journeys for the account, ordered by end time descending.
    async fn list_finalized(&self, account_id: &str) -> Result<Vec<Journey>, DespachoError>;

    /// The most recently finalized journey for the account, if any.
    async fn latest_finalized(
        &self,
        account_id: &str,
    ) -> Result<Option<Journey>, DespachoError>;

    /// Freeze a journey: status "finalizada", end time, computed summary.
    async fn finalize_journey(
        &self,
        id: &str,
        ended_at: DateTime<Utc>,
        summary: &JourneySummary,
    ) -> Result<(), DespachoError>;

    async fn delete_journey(&self, id: &str) -> Result<(), DespachoError>;

    /// Append an event to the journey's sub-log. The store assigns the event
    /// id and timestamp.
    async fn append_event(
        &self,
        journey_id: &str,
        event: &NewJourneyEvent,
    ) -> Result<(), DespachoError>;

    /// Events for a journey, ordered ascending by timestamp.
    async fn list_events(&self, journey_id: &str) -> Result<Vec<JourneyEvent>, DespachoError>;
}

/// CRUD + query access to delivery records.
#[async_trait]
pub trait DeliveryStore: Send + Sync {
    async fn add_delivery(&self, delivery: &Delivery) -> Result<(), DespachoError>;

    async fn get_delivery(&self, id: &str) -> Result<Option<Delivery>, DespachoError>;

    /// All deliveries, every account.
    async fn list_deliveries(&self) -> Result<Vec<Delivery>, DespachoError>;

    /// Deliveries belonging to one journey.
    async fn list_for_journey(&self, journey_id: &str) -> Result<Vec<Delivery>, DespachoError>;

    /// Atomic per-record status update. `requires_attention` is merged only
    /// when `Some`; existing value is kept otherwise.
    async fn update_status(
        &self,
        id: &str,
        status: DeliveryStatus,
        requires_attention: Option<bool>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DespachoError>;
}
