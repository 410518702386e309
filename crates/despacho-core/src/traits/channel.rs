// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification channel trait for the courier-facing messaging backend.
//!
//! The channel sends new outbound messages carrying optional interactive
//! actions, edits previously sent messages by handle, and (via webhook, out
//! of this trait's scope) produces [`InboundUpdate`]s that the engine
//! correlates back to deliveries.

use async_trait::async_trait;

use crate::error::DespachoError;
use crate::types::{HealthStatus, MessageHandle};

/// An interactive action attached to an outbound notification.
///
/// `token` is the structured correlation token echoed back verbatim when the
/// courier presses the action (`update:<deliveryId>:<outcome>` or
/// `note:<deliveryId>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub label: String,
    pub token: String,
}

/// A new outbound message for a courier-facing target (chat id, phone, ...).
#[derive(Debug, Clone)]
pub struct OutboundNotification {
    pub target: String,
    pub text: String,
    pub actions: Vec<NotificationAction>,
}

/// An inbound webhook callback, already mapped to channel-agnostic form.
#[derive(Debug, Clone)]
pub enum InboundUpdate {
    /// An interactive action was pressed on a previously sent message.
    Interaction {
        /// The structured token carried by the pressed action.
        token: String,
        /// Target the original message was sent to.
        target: String,
        /// Handle of the original message, for the follow-on edit.
        handle: MessageHandle,
        /// Text of the original message at press time.
        original_text: String,
    },
    /// A free-text reply (legacy channel; no structured token available).
    Reply {
        /// Sender's address on the channel (chat id, phone number).
        sender: String,
        /// Raw message body.
        body: String,
    },
}

/// Capability to send and edit courier-facing messages.
///
/// Sends are fire-and-forget from the engine's perspective: a failure must
/// never fail the core operation that triggered it.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Short channel name for logs ("telegram", "mock", ...).
    fn name(&self) -> &str;

    /// Send a new message; returns the channel's opaque message handle.
    async fn send(&self, notification: OutboundNotification)
        -> Result<MessageHandle, DespachoError>;

    /// Edit a previously sent message. Implementations must drop any
    /// interactive actions from the edited message (one-shot UI).
    async fn edit(
        &self,
        target: &str,
        handle: &MessageHandle,
        text: &str,
    ) -> Result<(), DespachoError>;

    /// Probe channel connectivity.
    async fn health_check(&self) -> Result<HealthStatus, DespachoError>;
}
