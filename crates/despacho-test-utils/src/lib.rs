// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Despacho: an in-memory record store and a mock
//! notification channel with captured outbound traffic.

pub mod memory_store;
pub mod mock_notifier;

pub use memory_store::MemoryStore;
pub use mock_notifier::MockNotifier;
