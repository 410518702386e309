// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`SqliteStore`]: the SQLite-backed implementation of the core store
//! traits. Thin delegation to the `queries` modules; no business logic here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use despacho_core::traits::{CourierStore, DeliveryStore, JourneyStore};
use despacho_core::{
    Courier, Delivery, DeliveryStatus, DespachoError, Journey, JourneyEvent, JourneySummary,
    NewJourneyEvent,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed record store.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open (or create) the store at `path`, running migrations.
    pub async fn open(path: &str) -> Result<Self, DespachoError> {
        let db = Database::open(path).await?;
        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoint and release the database.
    pub async fn close(&self) -> Result<(), DespachoError> {
        self.db.close().await
    }
}

#[async_trait]
impl CourierStore for SqliteStore {
    async fn add_courier(&self, courier: &Courier) -> Result<(), DespachoError> {
        queries::couriers::create_courier(&self.db, courier).await
    }

    async fn get_courier(&self, id: &str) -> Result<Option<Courier>, DespachoError> {
        queries::couriers::get_courier(&self.db, id).await
    }

    async fn update_courier(&self, courier: &Courier) -> Result<(), DespachoError> {
        queries::couriers::update_courier(&self.db, courier).await
    }

    async fn delete_courier(&self, id: &str) -> Result<(), DespachoError> {
        queries::couriers::delete_courier(&self.db, id).await
    }

    async fn list_couriers(&self) -> Result<Vec<Courier>, DespachoError> {
        queries::couriers::list_couriers(&self.db).await
    }

    async fn list_couriers_for_account(
        &self,
        account_id: &str,
    ) -> Result<Vec<Courier>, DespachoError> {
        queries::couriers::list_couriers_for_account(&self.db, account_id).await
    }

    async fn get_couriers(&self, ids: &[String]) -> Result<Vec<Courier>, DespachoError> {
        queries::couriers::get_couriers(&self.db, ids).await
    }
}

#[async_trait]
impl JourneyStore for SqliteStore {
    async fn add_journey(&self, journey: &Journey) -> Result<(), DespachoError> {
        queries::journeys::create_journey(&self.db, journey).await
    }

    async fn get_journey(&self, id: &str) -> Result<Option<Journey>, DespachoError> {
        queries::journeys::get_journey(&self.db, id).await
    }

    async fn find_active(&self, account_id: &str) -> Result<Vec<Journey>, DespachoError> {
        queries::journeys::find_active(&self.db, account_id).await
    }

    async fn list_finalized(&self, account_id: &str) -> Result<Vec<Journey>, DespachoError> {
        queries::journeys::list_finalized(&self.db, account_id).await
    }

    async fn latest_finalized(
        &self,
        account_id: &str,
    ) -> Result<Option<Journey>, DespachoError> {
        queries::journeys::latest_finalized(&self.db, account_id).await
    }

    async fn finalize_journey(
        &self,
        id: &str,
        ended_at: DateTime<Utc>,
        summary: &JourneySummary,
    ) -> Result<(), DespachoError> {
        queries::journeys::finalize_journey(&self.db, id, ended_at, summary).await
    }

    async fn delete_journey(&self, id: &str) -> Result<(), DespachoError> {
        queries::journeys::delete_journey(&self.db, id).await
    }

    async fn append_event(
        &self,
        journey_id: &str,
        event: &NewJourneyEvent,
    ) -> Result<(), DespachoError> {
        queries::events::append_event(&self.db, journey_id, event).await
    }

    async fn list_events(&self, journey_id: &str) -> Result<Vec<JourneyEvent>, DespachoError> {
        queries::events::list_events(&self.db, journey_id).await
    }
}

#[async_trait]
impl DeliveryStore for SqliteStore {
    async fn add_delivery(&self, delivery: &Delivery) -> Result<(), DespachoError> {
        queries::deliveries::create_delivery(&self.db, delivery).await
    }

    async fn get_delivery(&self, id: &str) -> Result<Option<Delivery>, DespachoError> {
        queries::deliveries::get_delivery(&self.db, id).await
    }

    async fn list_deliveries(&self) -> Result<Vec<Delivery>, DespachoError> {
        queries::deliveries::list_deliveries(&self.db).await
    }

    async fn list_for_journey(&self, journey_id: &str) -> Result<Vec<Delivery>, DespachoError> {
        queries::deliveries::list_for_journey(&self.db, journey_id).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: DeliveryStatus,
        requires_attention: Option<bool>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DespachoError> {
        queries::deliveries::update_status(&self.db, id, status, requires_attention, updated_at)
            .await
    }
}
