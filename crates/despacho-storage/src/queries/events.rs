// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journey event sub-log operations. Append-only: events are never updated
//! or deleted individually.

use despacho_core::{DeliveryStatus, DespachoError, EventKind, JourneyEvent, NewJourneyEvent};
use rusqlite::params;

use crate::database::Database;
use crate::queries::{parse_instant, parse_literal};

fn event_from_row(row: &rusqlite::Row<'_>) -> Result<JourneyEvent, rusqlite::Error> {
    let kind: String = row.get(1)?;
    let new_status: Option<String> = row.get(4)?;
    let created_at: String = row.get(5)?;
    Ok(JourneyEvent {
        id: row.get(0)?,
        kind: parse_literal::<EventKind>(1, &kind)?,
        text: row.get(2)?,
        delivery_id: row.get(3)?,
        new_status: new_status
            .as_deref()
            .map(|s| parse_literal::<DeliveryStatus>(4, s))
            .transpose()?,
        timestamp: parse_instant(5, &created_at)?,
    })
}

/// Append an event to a journey's sub-log. The database assigns the event ID
/// and timestamp.
pub async fn append_event(
    db: &Database,
    journey_id: &str,
    event: &NewJourneyEvent,
) -> Result<(), DespachoError> {
    let journey_id = journey_id.to_string();
    let event = event.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO journey_events (journey_id, kind, text, delivery_id, new_status)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    journey_id,
                    event.kind.to_string(),
                    event.text,
                    event.delivery_id,
                    event.new_status.map(|s| s.to_string()),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Events for a journey in chronological order. Insertion order breaks
/// timestamp ties.
pub async fn list_events(
    db: &Database,
    journey_id: &str,
) -> Result<Vec<JourneyEvent>, DespachoError> {
    let journey_id = journey_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, kind, text, delivery_id, new_status, created_at
                 FROM journey_events WHERE journey_id = ?1
                 ORDER BY created_at, id",
            )?;
            let rows = stmt.query_map(params![journey_id], event_from_row)?;
            let mut events = Vec::new();
            for row in rows {
                events.push(row?);
            }
            Ok(events)
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}
