// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courier CRUD operations.

use despacho_core::{Courier, DespachoError};
use rusqlite::params;

use crate::database::Database;

const COURIER_COLUMNS: &str = "id, name, phone, vehicle, route, photo_url, account_id";

fn courier_from_row(row: &rusqlite::Row<'_>) -> Result<Courier, rusqlite::Error> {
    Ok(Courier {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        vehicle: row.get(3)?,
        route: row.get(4)?,
        photo_url: row.get(5)?,
        account_id: row.get(6)?,
    })
}

/// Insert a new courier record.
pub async fn create_courier(db: &Database, courier: &Courier) -> Result<(), DespachoError> {
    let courier = courier.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO couriers (id, name, phone, vehicle, route, photo_url, account_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    courier.id,
                    courier.name,
                    courier.phone,
                    courier.vehicle,
                    courier.route,
                    courier.photo_url,
                    courier.account_id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Get a courier by ID.
pub async fn get_courier(db: &Database, id: &str) -> Result<Option<Courier>, DespachoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COURIER_COLUMNS} FROM couriers WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], courier_from_row);
            match result {
                Ok(courier) => Ok(Some(courier)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Full-record update of a courier. No-op if the ID does not exist.
pub async fn update_courier(db: &Database, courier: &Courier) -> Result<(), DespachoError> {
    let courier = courier.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE couriers
                 SET name = ?1, phone = ?2, vehicle = ?3, route = ?4,
                     photo_url = ?5, account_id = ?6
                 WHERE id = ?7",
                params![
                    courier.name,
                    courier.phone,
                    courier.vehicle,
                    courier.route,
                    courier.photo_url,
                    courier.account_id,
                    courier.id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Delete a courier by ID.
pub async fn delete_courier(db: &Database, id: &str) -> Result<(), DespachoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM couriers WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// List all couriers across every account, ordered by name.
pub async fn list_couriers(db: &Database) -> Result<Vec<Courier>, DespachoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COURIER_COLUMNS} FROM couriers ORDER BY name, id"
            ))?;
            let rows = stmt.query_map([], courier_from_row)?;
            let mut couriers = Vec::new();
            for row in rows {
                couriers.push(row?);
            }
            Ok(couriers)
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// List couriers belonging to one account, ordered by name.
pub async fn list_couriers_for_account(
    db: &Database,
    account_id: &str,
) -> Result<Vec<Courier>, DespachoError> {
    let account_id = account_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COURIER_COLUMNS} FROM couriers WHERE account_id = ?1 ORDER BY name, id"
            ))?;
            let rows = stmt.query_map(params![account_id], courier_from_row)?;
            let mut couriers = Vec::new();
            for row in rows {
                couriers.push(row?);
            }
            Ok(couriers)
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Fetch couriers matching any of the given IDs. Missing IDs are skipped.
pub async fn get_couriers(db: &Database, ids: &[String]) -> Result<Vec<Courier>, DespachoError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids = ids.to_vec();
    db.connection()
        .call(move |conn| {
            let placeholders = (1..=ids.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let mut stmt = conn.prepare(&format!(
                "SELECT {COURIER_COLUMNS} FROM couriers WHERE id IN ({placeholders}) ORDER BY name, id"
            ))?;
            let rows = stmt.query_map(rusqlite::params_from_iter(ids.iter()), courier_from_row)?;
            let mut couriers = Vec::new();
            for row in rows {
                couriers.push(row?);
            }
            Ok(couriers)
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}
