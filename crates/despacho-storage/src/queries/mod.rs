// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations, one module per record collection.

pub mod couriers;
pub mod deliveries;
pub mod events;
pub mod journeys;

use chrono::{DateTime, SecondsFormat, Utc};

/// Render an instant as ISO-8601 text with millisecond precision, the
/// database's canonical timestamp encoding.
pub(crate) fn fmt_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored ISO-8601 timestamp back into an instant.
pub(crate) fn parse_instant(column: usize, raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

/// Parse a stored enum literal via its `FromStr` impl.
pub(crate) fn parse_literal<T: std::str::FromStr>(
    column: usize,
    raw: &str,
) -> Result<T, rusqlite::Error> {
    raw.parse::<T>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            format!("unrecognized literal: {raw}").into(),
        )
    })
}
