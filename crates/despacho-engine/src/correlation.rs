// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound-reply correlation.
//!
//! Two strategies: structured tokens embedded in interactive actions
//! ([`CallbackToken`], stateless, preferred) and an address-keyed registry
//! ([`AddressRegistry`]) for channels that only echo the sender's address
//! and a free-text body.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Mutex;

use despacho_core::DeliveryStatus;

/// Structured correlation token carried by an interactive action and echoed
/// back verbatim on press.
///
/// Wire forms: `update:<deliveryId>:<outcome>` with outcome in
/// {`completed`, `failed`}, and `note:<deliveryId>`. Resolution is a pure
/// parse; no registry state is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackToken {
    /// Transition the delivery to the given terminal status.
    Update {
        delivery_id: String,
        outcome: DeliveryStatus,
    },
    /// Complete the delivery and flag it for attention; the courier follows
    /// up with a free-text observation.
    Note { delivery_id: String },
}

impl CallbackToken {
    /// Parse an echoed token. Returns `None` for anything that is not a
    /// well-formed token; callers ignore those updates.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(':');
        match parts.next()? {
            "update" => {
                let delivery_id = parts.next()?;
                let outcome = match parts.next()? {
                    "completed" => DeliveryStatus::Completed,
                    "failed" => DeliveryStatus::Failed,
                    _ => return None,
                };
                if delivery_id.is_empty() || parts.next().is_some() {
                    return None;
                }
                Some(CallbackToken::Update {
                    delivery_id: delivery_id.to_string(),
                    outcome,
                })
            }
            "note" => {
                let delivery_id = parts.next()?;
                if delivery_id.is_empty() || parts.next().is_some() {
                    return None;
                }
                Some(CallbackToken::Note {
                    delivery_id: delivery_id.to_string(),
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackToken::Update {
                delivery_id,
                outcome,
            } => {
                let outcome = match outcome {
                    DeliveryStatus::Failed => "failed",
                    _ => "completed",
                };
                write!(f, "update:{delivery_id}:{outcome}")
            }
            CallbackToken::Note { delivery_id } => write!(f, "note:{delivery_id}"),
        }
    }
}

/// Bounded contact-handle -> delivery-id map for the free-text fallback.
///
/// At most one in-flight correlation per contact handle: a second register
/// for the same handle clobbers the first. When full, the oldest entry is
/// evicted so unresolved correlations cannot grow without bound.
pub struct AddressRegistry {
    inner: Mutex<RegistryInner>,
    capacity: usize,
}

struct RegistryInner {
    entries: HashMap<String, String>,
    // Registration order, for oldest-first eviction.
    order: VecDeque<String>,
}

impl AddressRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    /// Map a contact handle to its most-recently-active delivery,
    /// overwriting any prior entry for that handle.
    pub fn register(&self, handle: &str, delivery_id: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.entries.insert(handle.to_string(), delivery_id.to_string()).is_some() {
            inner.order.retain(|h| h != handle);
        }
        inner.order.push_back(handle.to_string());
        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            }
        }
    }

    /// Look up the delivery currently correlated with a contact handle.
    pub fn resolve(&self, handle: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.get(handle).cloned()
    }

    /// Remove a handle's entry; called after a successful resolution.
    pub fn clear(&self, handle: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.entries.remove(handle).is_some() {
            inner.order.retain(|h| h != handle);
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
