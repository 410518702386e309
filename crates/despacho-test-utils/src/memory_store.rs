// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record store for deterministic testing.
//!
//! `MemoryStore` implements the three core store traits with the same
//! ordering guarantees as the SQLite backend, so engine and gateway tests
//! run without touching disk.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use despacho_core::traits::{CourierStore, DeliveryStore, JourneyStore};
use despacho_core::{
    Courier, Delivery, DeliveryStatus, DespachoError, Journey, JourneyEvent, JourneyStatus,
    JourneySummary, NewJourneyEvent,
};

#[derive(Default)]
struct Inner {
    couriers: HashMap<String, Courier>,
    journeys: HashMap<String, Journey>,
    deliveries: HashMap<String, Delivery>,
    events: Vec<(String, JourneyEvent)>,
    next_event_id: i64,
}

/// An in-memory store for testing.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events appended across all journeys.
    pub async fn event_count(&self) -> usize {
        self.inner.lock().await.events.len()
    }
}

#[async_trait]
impl CourierStore for MemoryStore {
    async fn add_courier(&self, courier: &Courier) -> Result<(), DespachoError> {
        self.inner
            .lock()
            .await
            .couriers
            .insert(courier.id.clone(), courier.clone());
        Ok(())
    }

    async fn get_courier(&self, id: &str) -> Result<Option<Courier>, DespachoError> {
        Ok(self.inner.lock().await.couriers.get(id).cloned())
    }

    async fn update_courier(&self, courier: &Courier) -> Result<(), DespachoError> {
        let mut inner = self.inner.lock().await;
        if inner.couriers.contains_key(&courier.id) {
            inner.couriers.insert(courier.id.clone(), courier.clone());
        }
        Ok(())
    }

    async fn delete_courier(&self, id: &str) -> Result<(), DespachoError> {
        self.inner.lock().await.couriers.remove(id);
        Ok(())
    }

    async fn list_couriers(&self) -> Result<Vec<Courier>, DespachoError> {
        let inner = self.inner.lock().await;
        let mut couriers: Vec<Courier> = inner.couriers.values().cloned().collect();
        couriers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(couriers)
    }

    async fn list_couriers_for_account(
        &self,
        account_id: &str,
    ) -> Result<Vec<Courier>, DespachoError> {
        let mut couriers: Vec<Courier> = self
            .inner
            .lock()
            .await
            .couriers
            .values()
            .filter(|c| c.account_id == account_id)
            .cloned()
            .collect();
        couriers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(couriers)
    }

    async fn get_couriers(&self, ids: &[String]) -> Result<Vec<Courier>, DespachoError> {
        let inner = self.inner.lock().await;
        let mut couriers: Vec<Courier> = ids
            .iter()
            .filter_map(|id| inner.couriers.get(id).cloned())
            .collect();
        couriers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(couriers)
    }
}

#[async_trait]
impl JourneyStore for MemoryStore {
    async fn add_journey(&self, journey: &Journey) -> Result<(), DespachoError> {
        self.inner
            .lock()
            .await
            .journeys
            .insert(journey.id.clone(), journey.clone());
        Ok(())
    }

    async fn get_journey(&self, id: &str) -> Result<Option<Journey>, DespachoError> {
        Ok(self.inner.lock().await.journeys.get(id).cloned())
    }

    async fn find_active(&self, account_id: &str) -> Result<Vec<Journey>, DespachoError> {
        let mut journeys: Vec<Journey> = self
            .inner
            .lock()
            .await
            .journeys
            .values()
            .filter(|j| j.account_id == account_id && j.status == JourneyStatus::Active)
            .cloned()
            .collect();
        journeys.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(journeys)
    }

    async fn list_finalized(&self, account_id: &str) -> Result<Vec<Journey>, DespachoError> {
        let mut journeys: Vec<Journey> = self
            .inner
            .lock()
            .await
            .journeys
            .values()
            .filter(|j| j.account_id == account_id && j.status == JourneyStatus::Finalized)
            .cloned()
            .collect();
        journeys.sort_by(|a, b| b.ended_at.cmp(&a.ended_at).then_with(|| a.id.cmp(&b.id)));
        Ok(journeys)
    }

    async fn latest_finalized(
        &self,
        account_id: &str,
    ) -> Result<Option<Journey>, DespachoError> {
        Ok(self.list_finalized(account_id).await?.into_iter().next())
    }

    async fn finalize_journey(
        &self,
        id: &str,
        ended_at: DateTime<Utc>,
        summary: &JourneySummary,
    ) -> Result<(), DespachoError> {
        let mut inner = self.inner.lock().await;
        if let Some(journey) = inner.journeys.get_mut(id) {
            journey.status = JourneyStatus::Finalized;
            journey.ended_at = Some(ended_at);
            journey.summary = Some(summary.clone());
        }
        Ok(())
    }

    async fn delete_journey(&self, id: &str) -> Result<(), DespachoError> {
        let mut inner = self.inner.lock().await;
        inner.journeys.remove(id);
        inner.events.retain(|(journey_id, _)| journey_id != id);
        Ok(())
    }

    async fn append_event(
        &self,
        journey_id: &str,
        event: &NewJourneyEvent,
    ) -> Result<(), DespachoError> {
        let mut inner = self.inner.lock().await;
        inner.next_event_id += 1;
        let stored = JourneyEvent {
            id: inner.next_event_id,
            kind: event.kind,
            text: event.text.clone(),
            delivery_id: event.delivery_id.clone(),
            new_status: event.new_status,
            timestamp: Utc::now(),
        };
        inner.events.push((journey_id.to_string(), stored));
        Ok(())
    }

    async fn list_events(&self, journey_id: &str) -> Result<Vec<JourneyEvent>, DespachoError> {
        let mut events: Vec<JourneyEvent> = self
            .inner
            .lock()
            .await
            .events
            .iter()
            .filter(|(id, _)| id == journey_id)
            .map(|(_, e)| e.clone())
            .collect();
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }
}

#[async_trait]
impl DeliveryStore for MemoryStore {
    async fn add_delivery(&self, delivery: &Delivery) -> Result<(), DespachoError> {
        self.inner
            .lock()
            .await
            .deliveries
            .insert(delivery.id.clone(), delivery.clone());
        Ok(())
    }

    async fn get_delivery(&self, id: &str) -> Result<Option<Delivery>, DespachoError> {
        Ok(self.inner.lock().await.deliveries.get(id).cloned())
    }

    async fn list_deliveries(&self) -> Result<Vec<Delivery>, DespachoError> {
        let mut deliveries: Vec<Delivery> =
            self.inner.lock().await.deliveries.values().cloned().collect();
        deliveries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(deliveries)
    }

    async fn list_for_journey(&self, journey_id: &str) -> Result<Vec<Delivery>, DespachoError> {
        let mut deliveries: Vec<Delivery> = self
            .inner
            .lock()
            .await
            .deliveries
            .values()
            .filter(|d| d.journey_id.as_deref() == Some(journey_id))
            .cloned()
            .collect();
        deliveries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(deliveries)
    }

    async fn update_status(
        &self,
        id: &str,
        status: DeliveryStatus,
        requires_attention: Option<bool>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), DespachoError> {
        let mut inner = self.inner.lock().await;
        if let Some(delivery) = inner.deliveries.get_mut(id) {
            delivery.status = status;
            if let Some(flag) = requires_attention {
                delivery.requires_attention = flag;
            }
            delivery.updated_at = Some(updated_at);
        }
        Ok(())
    }
}
