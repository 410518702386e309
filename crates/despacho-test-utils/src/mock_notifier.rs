// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock notification channel for deterministic testing.
//!
//! `MockNotifier` implements `NotificationChannel` with captured outbound
//! traffic and an injectable send failure, so tests can assert both what was
//! sent and that channel failures never fail core operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use despacho_core::traits::{NotificationChannel, OutboundNotification};
use despacho_core::{DespachoError, HealthStatus, MessageHandle};

/// A recorded edit: target, message handle, replacement text.
#[derive(Debug, Clone)]
pub struct RecordedEdit {
    pub target: String,
    pub handle: MessageHandle,
    pub text: String,
}

/// A mock notification channel for testing.
///
/// Captures two logs:
/// - **sent**: notifications passed to `send()`, with their assigned handles
/// - **edits**: every `edit()` call
#[derive(Clone, Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<(MessageHandle, OutboundNotification)>>>,
    edits: Arc<Mutex<Vec<RecordedEdit>>>,
    fail_sends: Arc<AtomicBool>,
    next_handle: Arc<AtomicU64>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make all subsequent `send()` calls fail with a channel error.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// All notifications sent so far, with their handles, in send order.
    pub async fn sent(&self) -> Vec<(MessageHandle, OutboundNotification)> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// All edits applied so far, in call order.
    pub async fn edits(&self) -> Vec<RecordedEdit> {
        self.edits.lock().await.clone()
    }
}

#[async_trait]
impl NotificationChannel for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(
        &self,
        notification: OutboundNotification,
    ) -> Result<MessageHandle, DespachoError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(DespachoError::Channel {
                message: "mock send failure".to_string(),
                source: None,
            });
        }
        let n = self.next_handle.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = MessageHandle(format!("mock-msg-{n}"));
        self.sent.lock().await.push((handle.clone(), notification));
        Ok(handle)
    }

    async fn edit(
        &self,
        target: &str,
        handle: &MessageHandle,
        text: &str,
    ) -> Result<(), DespachoError> {
        self.edits.lock().await.push(RecordedEdit {
            target: target.to_string(),
            handle: handle.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, DespachoError> {
        Ok(HealthStatus::Healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use despacho_core::traits::NotificationAction;

    fn make_notification(text: &str) -> OutboundNotification {
        OutboundNotification {
            target: "chat-1".to_string(),
            text: text.to_string(),
            actions: vec![NotificationAction {
                label: "✅ Concluída".to_string(),
                token: "update:d-1:completed".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn send_captures_and_assigns_handles() {
        let notifier = MockNotifier::new();
        let h1 = notifier.send(make_notification("first")).await.unwrap();
        let h2 = notifier.send(make_notification("second")).await.unwrap();
        assert_ne!(h1, h2);

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, h1);
        assert_eq!(sent[0].1.text, "first");
        assert_eq!(sent[1].1.text, "second");
    }

    #[tokio::test]
    async fn injected_failure_fails_sends_only() {
        let notifier = MockNotifier::new();
        notifier.fail_sends(true);
        assert!(notifier.send(make_notification("x")).await.is_err());
        assert_eq!(notifier.sent_count().await, 0);

        // Edits still work.
        notifier
            .edit("chat-1", &MessageHandle("m-1".to_string()), "updated")
            .await
            .unwrap();
        assert_eq!(notifier.edits().await.len(), 1);

        notifier.fail_sends(false);
        assert!(notifier.send(make_notification("y")).await.is_ok());
    }

    #[tokio::test]
    async fn edits_are_recorded_in_order() {
        let notifier = MockNotifier::new();
        let handle = notifier.send(make_notification("orig")).await.unwrap();
        notifier.edit("chat-1", &handle, "edit one").await.unwrap();
        notifier.edit("chat-1", &handle, "edit two").await.unwrap();

        let edits = notifier.edits().await;
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].text, "edit one");
        assert_eq!(edits[1].text, "edit two");
        assert_eq!(edits[1].handle, handle);
    }
}
