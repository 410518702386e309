// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status reconciler: validates and applies delivery status transitions and
//! correlates inbound webhook updates back to deliveries.

use chrono::Utc;
use tracing::{debug, info, warn};

use despacho_core::{
    Delivery, DeliveryStatus, DespachoError, EventKind, MessageHandle, NewJourneyEvent,
};

use crate::correlation::CallbackToken;
use crate::lifecycle::DispatchEngine;
use crate::text;

/// Who requested a transition. The manager path is unvalidated (trusted
/// override); the courier path is checked against the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOrigin {
    Manager,
    Courier,
}

// Case-insensitive substring synonyms for the free-text fallback. Failure
// synonyms are checked first: "não entregue" contains "entregue".
const FAILED_SYNONYMS: &[&str] = &["falhou", "falha", "não entregue", "nao entregue", "problema"];
const COMPLETED_SYNONYMS: &[&str] = &["concluída", "concluida", "entregue", "feito", "ok"];

/// Classify a free-text reply body. `None` means no transition.
pub fn classify_reply(body: &str) -> Option<DeliveryStatus> {
    let body = body.to_lowercase();
    if FAILED_SYNONYMS.iter().any(|s| body.contains(s)) {
        return Some(DeliveryStatus::Failed);
    }
    if COMPLETED_SYNONYMS.iter().any(|s| body.contains(s)) {
        return Some(DeliveryStatus::Completed);
    }
    None
}

impl DispatchEngine {
    /// Apply a status transition to a delivery.
    ///
    /// Courier-origin transitions are validated: re-applying the current
    /// terminal status is a logged no-op (duplicate webhook deliveries);
    /// any other transition away from a terminal status is rejected. The
    /// manager path is exempt from both checks.
    ///
    /// Returns the updated delivery and whether the transition was applied.
    pub async fn apply_transition(
        &self,
        delivery_id: &str,
        new_status: DeliveryStatus,
        with_note: bool,
        origin: TransitionOrigin,
    ) -> Result<(Delivery, bool), DespachoError> {
        let mut delivery = self
            .deliveries
            .get_delivery(delivery_id)
            .await?
            .ok_or_else(|| DespachoError::NotFound {
                entity: "delivery",
                id: delivery_id.to_string(),
            })?;

        if origin == TransitionOrigin::Courier && delivery.status.is_terminal() {
            if delivery.status == new_status {
                info!(
                    delivery_id,
                    status = %delivery.status,
                    "duplicate transition ignored"
                );
                return Ok((delivery, false));
            }
            return Err(DespachoError::InvalidTransition {
                delivery_id: delivery_id.to_string(),
                current: delivery.status,
            });
        }

        let requires_attention = with_note.then_some(true);
        let now = Utc::now();
        self.deliveries
            .update_status(delivery_id, new_status, requires_attention, now)
            .await?;
        delivery.status = new_status;
        delivery.updated_at = Some(now);
        if with_note {
            delivery.requires_attention = true;
        }

        if let Some(journey_id) = delivery.journey_id.as_deref() {
            let event_text = match origin {
                TransitionOrigin::Manager => text::manager_status_event_text(&delivery, new_status),
                TransitionOrigin::Courier => text::courier_status_event_text(&delivery, new_status),
            };
            self.journeys
                .append_event(
                    journey_id,
                    &NewJourneyEvent {
                        kind: EventKind::StatusChange,
                        text: event_text,
                        delivery_id: delivery.id.clone(),
                        new_status: Some(new_status),
                    },
                )
                .await?;
        }

        info!(delivery_id, status = %new_status, ?origin, "status applied");
        Ok((delivery, true))
    }

    /// Handle an interactive-action press echoed back by the channel.
    ///
    /// Applies the tokenized transition, then edits the original message so
    /// its actions disappear (one-shot UI). Edit failures are logged and
    /// swallowed.
    pub async fn handle_interaction(
        &self,
        token: &str,
        target: &str,
        handle: &MessageHandle,
        original_text: &str,
    ) -> Result<(), DespachoError> {
        let Some(token) = CallbackToken::parse(token) else {
            warn!(token, "unrecognized interaction token ignored");
            return Ok(());
        };

        let edited = match token {
            CallbackToken::Update {
                delivery_id,
                outcome,
            } => {
                let (_, applied) = self
                    .apply_transition(&delivery_id, outcome, false, TransitionOrigin::Courier)
                    .await?;
                applied.then(|| text::status_update_text(original_text, outcome))
            }
            CallbackToken::Note { delivery_id } => {
                let (_, applied) = self
                    .apply_transition(
                        &delivery_id,
                        DeliveryStatus::Completed,
                        true,
                        TransitionOrigin::Courier,
                    )
                    .await?;
                applied.then(|| text::note_prompt_text(original_text))
            }
        };

        // Resolved: the target's fallback correlation is stale now.
        self.registry.clear(target);

        if let Some(new_text) = edited {
            if let Err(e) = self.channel.edit(target, handle, &new_text).await {
                warn!(
                    target,
                    handle = %handle.0,
                    channel = self.channel.name(),
                    error = %e,
                    "message edit failed"
                );
            }
        }
        Ok(())
    }

    /// Handle a free-text reply (legacy channel, no structured token).
    ///
    /// Resolves the sender through the address registry and classifies the
    /// body; unrecognized bodies and unknown senders are silently ignored.
    pub async fn handle_reply(&self, sender: &str, body: &str) -> Result<(), DespachoError> {
        let Some(delivery_id) = self.registry.resolve(sender) else {
            debug!(sender, "reply from sender with no in-flight correlation");
            return Ok(());
        };
        let Some(status) = classify_reply(body) else {
            debug!(sender, "reply body did not classify to a transition");
            return Ok(());
        };

        self.apply_transition(&delivery_id, status, false, TransitionOrigin::Courier)
            .await?;
        self.registry.clear(sender);
        Ok(())
    }
}
