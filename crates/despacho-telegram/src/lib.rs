// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram notification channel for Despacho.
//!
//! Implements [`NotificationChannel`] via teloxide: new-delivery messages
//! with inline-keyboard actions, one-shot edits that drop the keyboard, and
//! webhook payload mapping to channel-agnostic [`InboundUpdate`]s.

pub mod webhook;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, Recipient};
use tracing::debug;

use despacho_core::traits::{NotificationChannel, OutboundNotification};
use despacho_core::{DespachoError, HealthStatus, MessageHandle};

/// Telegram channel implementing [`NotificationChannel`].
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    /// Creates a new Telegram notifier from a bot token.
    pub fn new(token: &str) -> Result<Self, DespachoError> {
        if token.is_empty() {
            return Err(DespachoError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }
        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn parse_chat_id(target: &str) -> Result<ChatId, DespachoError> {
    target
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| DespachoError::Channel {
            message: format!("invalid chat id {target:?}: {e}"),
            source: None,
        })
}

/// Inline keyboard layout: two actions per row, matching the legacy bot's
/// completed/failed row followed by the add-note row.
fn keyboard_for(notification: &OutboundNotification) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = notification
        .actions
        .chunks(2)
        .map(|chunk| {
            chunk
                .iter()
                .map(|a| InlineKeyboardButton::callback(a.label.clone(), a.token.clone()))
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

#[async_trait]
impl NotificationChannel for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(
        &self,
        notification: OutboundNotification,
    ) -> Result<MessageHandle, DespachoError> {
        let chat_id = parse_chat_id(&notification.target)?;

        let mut request = self
            .bot
            .send_message(Recipient::Id(chat_id), &notification.text)
            .parse_mode(ParseMode::Markdown);
        if !notification.actions.is_empty() {
            request = request.reply_markup(keyboard_for(&notification));
        }

        let sent = request.await.map_err(|e| DespachoError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;

        debug!(chat_id = chat_id.0, message_id = sent.id.0, "message sent");
        Ok(MessageHandle(sent.id.0.to_string()))
    }

    async fn edit(
        &self,
        target: &str,
        handle: &MessageHandle,
        text: &str,
    ) -> Result<(), DespachoError> {
        let chat_id = parse_chat_id(target)?;
        let message_id = handle
            .0
            .parse::<i32>()
            .map(teloxide::types::MessageId)
            .map_err(|e| DespachoError::Channel {
                message: format!("invalid message handle {:?}: {e}", handle.0),
                source: None,
            })?;

        // No reply_markup on the edit: the inline keyboard disappears, so a
        // resolved delivery's message never re-offers actions.
        let result = self
            .bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Markdown)
            .await;

        match result {
            Ok(_) => Ok(()),
            // Duplicate webhook deliveries re-edit with identical text.
            Err(e) if e.to_string().contains("message is not modified") => Ok(()),
            Err(e) => Err(DespachoError::Channel {
                message: format!("failed to edit message: {e}"),
                source: Some(Box::new(e)),
            }),
        }
    }

    async fn health_check(&self) -> Result<HealthStatus, DespachoError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }
}
