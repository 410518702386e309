// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits implemented by concrete backends.

pub mod channel;
pub mod store;

pub use channel::{
    InboundUpdate, NotificationAction, NotificationChannel, OutboundNotification,
};
pub use store::{CourierStore, DeliveryStore, JourneyStore};
