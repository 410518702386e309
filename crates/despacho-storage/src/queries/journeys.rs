// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journey CRUD and query operations.
//!
//! `courier_ids` and `summary` are stored as JSON text columns.

use chrono::{DateTime, Utc};
use despacho_core::{DespachoError, Journey, JourneyStatus, JourneySummary};
use rusqlite::params;

use crate::database::Database;
use crate::queries::{fmt_instant, parse_instant, parse_literal};

const JOURNEY_COLUMNS: &str = "id, account_id, status, courier_ids, started_at, ended_at, summary";

fn json_err(column: usize, e: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
}

fn journey_from_row(row: &rusqlite::Row<'_>) -> Result<Journey, rusqlite::Error> {
    let status: String = row.get(2)?;
    let courier_ids: String = row.get(3)?;
    let started_at: String = row.get(4)?;
    let ended_at: Option<String> = row.get(5)?;
    let summary: Option<String> = row.get(6)?;
    Ok(Journey {
        id: row.get(0)?,
        account_id: row.get(1)?,
        status: parse_literal::<JourneyStatus>(2, &status)?,
        courier_ids: serde_json::from_str(&courier_ids).map_err(|e| json_err(3, e))?,
        started_at: parse_instant(4, &started_at)?,
        ended_at: ended_at.as_deref().map(|s| parse_instant(5, s)).transpose()?,
        summary: summary
            .as_deref()
            .map(serde_json::from_str::<JourneySummary>)
            .transpose()
            .map_err(|e| json_err(6, e))?,
    })
}

/// Insert a new journey record.
pub async fn create_journey(db: &Database, journey: &Journey) -> Result<(), DespachoError> {
    let journey = journey.clone();
    let courier_ids = serde_json::to_string(&journey.courier_ids)
        .map_err(|e| DespachoError::Internal(format!("courier_ids encoding failed: {e}")))?;
    let summary = journey
        .summary
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| DespachoError::Internal(format!("summary encoding failed: {e}")))?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO journeys (id, account_id, status, courier_ids, started_at, ended_at, summary)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    journey.id,
                    journey.account_id,
                    journey.status.to_string(),
                    courier_ids,
                    fmt_instant(journey.started_at),
                    journey.ended_at.map(fmt_instant),
                    summary,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Get a journey by ID.
pub async fn get_journey(db: &Database, id: &str) -> Result<Option<Journey>, DespachoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {JOURNEY_COLUMNS} FROM journeys WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], journey_from_row);
            match result {
                Ok(journey) => Ok(Some(journey)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Active journeys for an account, ordered by start time then ID.
///
/// Expected to hold at most one element; callers tie-break deterministically
/// when the invariant is violated.
pub async fn find_active(db: &Database, account_id: &str) -> Result<Vec<Journey>, DespachoError> {
    let account_id = account_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {JOURNEY_COLUMNS} FROM journeys
                 WHERE account_id = ?1 AND status = 'ativa'
                 ORDER BY started_at, id"
            ))?;
            let rows = stmt.query_map(params![account_id], journey_from_row)?;
            let mut journeys = Vec::new();
            for row in rows {
                journeys.push(row?);
            }
            Ok(journeys)
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Finalized journeys for an account, most recently ended first.
pub async fn list_finalized(
    db: &Database,
    account_id: &str,
) -> Result<Vec<Journey>, DespachoError> {
    let account_id = account_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {JOURNEY_COLUMNS} FROM journeys
                 WHERE account_id = ?1 AND status = 'finalizada'
                 ORDER BY ended_at DESC, id"
            ))?;
            let rows = stmt.query_map(params![account_id], journey_from_row)?;
            let mut journeys = Vec::new();
            for row in rows {
                journeys.push(row?);
            }
            Ok(journeys)
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// The most recently finalized journey for an account, if any.
pub async fn latest_finalized(
    db: &Database,
    account_id: &str,
) -> Result<Option<Journey>, DespachoError> {
    let account_id = account_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {JOURNEY_COLUMNS} FROM journeys
                 WHERE account_id = ?1 AND status = 'finalizada'
                 ORDER BY ended_at DESC, id LIMIT 1"
            ))?;
            let result = stmt.query_row(params![account_id], journey_from_row);
            match result {
                Ok(journey) => Ok(Some(journey)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Freeze a journey: status "finalizada", end time, computed summary.
pub async fn finalize_journey(
    db: &Database,
    id: &str,
    ended_at: DateTime<Utc>,
    summary: &JourneySummary,
) -> Result<(), DespachoError> {
    let id = id.to_string();
    let summary = serde_json::to_string(summary)
        .map_err(|e| DespachoError::Internal(format!("summary encoding failed: {e}")))?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE journeys SET status = 'finalizada', ended_at = ?1, summary = ?2
                 WHERE id = ?3",
                params![fmt_instant(ended_at), summary, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Delete a journey by ID. The event sub-log is removed with it.
pub async fn delete_journey(db: &Database, id: &str) -> Result<(), DespachoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM journey_events WHERE journey_id = ?1",
                params![id],
            )?;
            tx.execute("DELETE FROM journeys WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}
