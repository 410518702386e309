// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch engine for the Despacho service.
//!
//! Owns the delivery lifecycle (creation, notification fan-out), the status
//! reconciler (state-machine validation, inbound webhook correlation), and
//! journey finalization. Depends only on the store and channel traits from
//! `despacho-core`; concrete backends are injected.

pub mod correlation;
pub mod lifecycle;
pub mod reconciler;
pub mod summary;
pub mod text;

pub use correlation::{AddressRegistry, CallbackToken};
pub use lifecycle::{DispatchEngine, NewDelivery};
pub use reconciler::TransitionOrigin;
pub use summary::summarize;
