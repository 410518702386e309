// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook payload mapping.
//!
//! Telegram delivers updates as JSON to the configured webhook URL. This
//! module maps the two update shapes the service cares about — inline
//! keyboard presses and plain text messages — into channel-agnostic
//! [`InboundUpdate`]s. Everything else is ignored.

use teloxide::types::{Update, UpdateKind};
use tracing::debug;

use despacho_core::traits::InboundUpdate;
use despacho_core::MessageHandle;

/// Map a raw webhook payload to an [`InboundUpdate`].
///
/// Returns `None` for payloads that are not well-formed updates, callback
/// queries without data or an accessible origin message, and update kinds
/// the service does not handle. A `None` is never an error: Telegram
/// retries on non-200 responses, so unhandled updates must be acknowledged.
pub fn parse_update(payload: &serde_json::Value) -> Option<InboundUpdate> {
    let update: Update = match serde_json::from_value(payload.clone()) {
        Ok(update) => update,
        Err(e) => {
            debug!(error = %e, "ignoring undecodable webhook payload");
            return None;
        }
    };

    match update.kind {
        UpdateKind::CallbackQuery(query) => {
            let message = query.regular_message()?.clone();
            let token = query.data?;
            Some(InboundUpdate::Interaction {
                token,
                target: message.chat.id.0.to_string(),
                handle: MessageHandle(message.id.0.to_string()),
                original_text: message.text().unwrap_or_default().to_string(),
            })
        }
        UpdateKind::Message(message) => {
            let body = message.text()?.to_string();
            Some(InboundUpdate::Reply {
                sender: message.chat.id.0.to_string(),
                body,
            })
        }
        _ => {
            debug!("ignoring unhandled update kind");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message_json(chat_id: i64, message_id: i32, text: &str) -> serde_json::Value {
        json!({
            "message_id": message_id,
            "date": 1700000000i64,
            "chat": {
                "id": chat_id,
                "type": "private",
                "first_name": "Courier",
            },
            "from": {
                "id": 777,
                "is_bot": false,
                "first_name": "Courier",
            },
            "text": text,
        })
    }

    fn callback_update(data: &str, original_text: &str) -> serde_json::Value {
        json!({
            "update_id": 1,
            "callback_query": {
                "id": "cb-1",
                "from": {
                    "id": 777,
                    "is_bot": false,
                    "first_name": "Courier",
                },
                "chat_instance": "ci-1",
                "message": message_json(12345, 42, original_text),
                "data": data,
            }
        })
    }

    #[test]
    fn callback_query_maps_to_interaction() {
        let payload = callback_update("update:d-1:completed", "*Nova Entrega para Padaria!*");
        let update = parse_update(&payload).unwrap();
        match update {
            InboundUpdate::Interaction {
                token,
                target,
                handle,
                original_text,
            } => {
                assert_eq!(token, "update:d-1:completed");
                assert_eq!(target, "12345");
                assert_eq!(handle, MessageHandle("42".to_string()));
                assert_eq!(original_text, "*Nova Entrega para Padaria!*");
            }
            other => panic!("expected interaction, got {other:?}"),
        }
    }

    #[test]
    fn text_message_maps_to_reply() {
        let payload = json!({
            "update_id": 2,
            "message": message_json(12345, 43, "entregue, tudo certo"),
        });
        let update = parse_update(&payload).unwrap();
        match update {
            InboundUpdate::Reply { sender, body } => {
                assert_eq!(sender, "12345");
                assert_eq!(body, "entregue, tudo certo");
            }
            other => panic!("expected reply, got {other:?}"),
        }
    }

    #[test]
    fn callback_without_data_is_ignored() {
        let payload = json!({
            "update_id": 3,
            "callback_query": {
                "id": "cb-2",
                "from": {
                    "id": 777,
                    "is_bot": false,
                    "first_name": "Courier",
                },
                "chat_instance": "ci-1",
                "message": message_json(12345, 44, "orig"),
            }
        });
        assert!(parse_update(&payload).is_none());
    }

    #[test]
    fn non_text_message_is_ignored() {
        let payload = json!({
            "update_id": 4,
            "message": {
                "message_id": 45,
                "date": 1700000000i64,
                "chat": {
                    "id": 12345i64,
                    "type": "private",
                    "first_name": "Courier",
                },
                "from": {
                    "id": 777,
                    "is_bot": false,
                    "first_name": "Courier",
                },
                "photo": [{
                    "file_id": "f-1",
                    "file_unique_id": "fu-1",
                    "width": 100,
                    "height": 100,
                }],
            }
        });
        assert!(parse_update(&payload).is_none());
    }

    #[test]
    fn garbage_payload_is_ignored() {
        assert!(parse_update(&json!({"hello": "world"})).is_none());
        assert!(parse_update(&json!(null)).is_none());
        assert!(parse_update(&json!("text")).is_none());
    }
}
