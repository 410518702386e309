// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loading for the Despacho dispatch service.
//!
//! TOML files following XDG hierarchy with `DESPACHO_` environment variable
//! overrides. All sections are optional and default to sensible values.

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::DespachoConfig;
