// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery lifecycle engine: creation, journey start, notification fan-out.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use despacho_core::traits::{
    CourierStore, DeliveryStore, JourneyStore, NotificationAction, NotificationChannel,
    OutboundNotification,
};
use despacho_core::{
    Delivery, DeliveryStatus, DespachoError, EventKind, Journey, JourneyStatus, NewJourneyEvent,
};

use crate::correlation::{AddressRegistry, CallbackToken};
use crate::text;

/// Boundary-validated fields for a new delivery.
#[derive(Debug, Clone)]
pub struct NewDelivery {
    pub client_name: String,
    pub address: String,
    pub order_label: String,
    pub courier_id: String,
    pub kind: Option<String>,
    pub amount_to_collect: Option<f64>,
}

/// The dispatch engine. Owns the correlation registry; store and channel
/// backends are injected as trait objects.
pub struct DispatchEngine {
    pub(crate) couriers: Arc<dyn CourierStore>,
    pub(crate) journeys: Arc<dyn JourneyStore>,
    pub(crate) deliveries: Arc<dyn DeliveryStore>,
    pub(crate) channel: Arc<dyn NotificationChannel>,
    pub(crate) registry: AddressRegistry,
    /// Notification target (chat id). When absent, notifications are skipped
    /// entirely and deliveries are still created.
    notify_target: Option<String>,
}

impl DispatchEngine {
    pub fn new(
        couriers: Arc<dyn CourierStore>,
        journeys: Arc<dyn JourneyStore>,
        deliveries: Arc<dyn DeliveryStore>,
        channel: Arc<dyn NotificationChannel>,
        notify_target: Option<String>,
        correlation_capacity: usize,
    ) -> Self {
        Self {
            couriers,
            journeys,
            deliveries,
            channel,
            registry: AddressRegistry::new(correlation_capacity),
            notify_target,
        }
    }

    pub fn registry(&self) -> &AddressRegistry {
        &self.registry
    }

    /// Create a delivery against the courier's active journey and notify the
    /// courier. Notification failure never fails the creation.
    pub async fn create_delivery(&self, new: NewDelivery) -> Result<Delivery, DespachoError> {
        let courier = self
            .couriers
            .get_courier(&new.courier_id)
            .await?
            .ok_or_else(|| DespachoError::NotFound {
                entity: "courier",
                id: new.courier_id.clone(),
            })?;

        // Deterministic tie-break if the one-active-journey invariant is
        // violated: find_active orders by start time then id.
        let journey = self
            .journeys
            .find_active(&courier.account_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DespachoError::NoActiveJourney {
                account_id: courier.account_id.clone(),
            })?;

        let amount = new.amount_to_collect.unwrap_or(0.0);
        if amount < 0.0 {
            return Err(DespachoError::Validation(
                "valorCobrar não pode ser negativo".to_string(),
            ));
        }

        let delivery = Delivery {
            id: Uuid::new_v4().to_string(),
            client_name: new.client_name,
            address: new.address,
            order_label: new.order_label,
            kind: new.kind.unwrap_or_else(|| "Entrega".to_string()),
            amount_to_collect: amount,
            status: DeliveryStatus::InTransit,
            requires_attention: false,
            courier_id: courier.id.clone(),
            account_id: courier.account_id.clone(),
            journey_id: Some(journey.id.clone()),
            created_at: Utc::now(),
            updated_at: None,
        };
        self.deliveries.add_delivery(&delivery).await?;

        self.journeys
            .append_event(
                &journey.id,
                &NewJourneyEvent {
                    kind: EventKind::Creation,
                    text: text::creation_event_text(&delivery, &courier),
                    delivery_id: delivery.id.clone(),
                    new_status: None,
                },
            )
            .await?;

        info!(
            delivery_id = %delivery.id,
            journey_id = %journey.id,
            courier_id = %courier.id,
            "delivery created"
        );

        self.notify_new_delivery(&delivery).await;
        Ok(delivery)
    }

    /// Start a journey for an account. At most one active journey per
    /// account, enforced by query-before-create.
    pub async fn start_journey(
        &self,
        account_id: &str,
        courier_ids: Vec<String>,
    ) -> Result<Journey, DespachoError> {
        if !self.journeys.find_active(account_id).await?.is_empty() {
            return Err(DespachoError::ActiveJourneyExists {
                account_id: account_id.to_string(),
            });
        }
        let journey = Journey {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            status: JourneyStatus::Active,
            courier_ids,
            started_at: Utc::now(),
            ended_at: None,
            summary: None,
        };
        self.journeys.add_journey(&journey).await?;
        info!(journey_id = %journey.id, account_id, "journey started");
        Ok(journey)
    }

    /// Fire-and-forget: register the correlation and send the notification.
    /// Failures are logged with context and swallowed.
    async fn notify_new_delivery(&self, delivery: &Delivery) {
        let Some(target) = self.notify_target.as_deref() else {
            return;
        };

        // Fallback correlation for free-text replies from this target.
        self.registry.register(target, &delivery.id);

        let notification = OutboundNotification {
            target: target.to_string(),
            text: text::notification_text(delivery),
            actions: vec![
                NotificationAction {
                    label: "✅ Concluída".to_string(),
                    token: CallbackToken::Update {
                        delivery_id: delivery.id.clone(),
                        outcome: DeliveryStatus::Completed,
                    }
                    .to_string(),
                },
                NotificationAction {
                    label: "❌ Falhou".to_string(),
                    token: CallbackToken::Update {
                        delivery_id: delivery.id.clone(),
                        outcome: DeliveryStatus::Failed,
                    }
                    .to_string(),
                },
                NotificationAction {
                    label: "📝 Adicionar Observação".to_string(),
                    token: CallbackToken::Note {
                        delivery_id: delivery.id.clone(),
                    }
                    .to_string(),
                },
            ],
        };

        if let Err(e) = self.channel.send(notification).await {
            warn!(
                delivery_id = %delivery.id,
                channel = self.channel.name(),
                error = %e,
                "notification send failed; delivery already persisted"
            );
        }
    }
}
