// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery CRUD and query operations.

use chrono::{DateTime, Utc};
use despacho_core::{Delivery, DeliveryStatus, DespachoError};
use rusqlite::params;

use crate::database::Database;
use crate::queries::{fmt_instant, parse_instant, parse_literal};

const DELIVERY_COLUMNS: &str = "id, client_name, address, order_label, kind, amount_to_collect, \
     status, requires_attention, courier_id, account_id, journey_id, created_at, updated_at";

fn delivery_from_row(row: &rusqlite::Row<'_>) -> Result<Delivery, rusqlite::Error> {
    let status: String = row.get(6)?;
    let created_at: String = row.get(11)?;
    let updated_at: Option<String> = row.get(12)?;
    Ok(Delivery {
        id: row.get(0)?,
        client_name: row.get(1)?,
        address: row.get(2)?,
        order_label: row.get(3)?,
        kind: row.get(4)?,
        amount_to_collect: row.get(5)?,
        status: parse_literal::<DeliveryStatus>(6, &status)?,
        requires_attention: row.get(7)?,
        courier_id: row.get(8)?,
        account_id: row.get(9)?,
        journey_id: row.get(10)?,
        created_at: parse_instant(11, &created_at)?,
        updated_at: updated_at
            .as_deref()
            .map(|s| parse_instant(12, s))
            .transpose()?,
    })
}

/// Insert a new delivery record.
pub async fn create_delivery(db: &Database, delivery: &Delivery) -> Result<(), DespachoError> {
    let delivery = delivery.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO deliveries (id, client_name, address, order_label, kind,
                     amount_to_collect, status, requires_attention, courier_id, account_id,
                     journey_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    delivery.id,
                    delivery.client_name,
                    delivery.address,
                    delivery.order_label,
                    delivery.kind,
                    delivery.amount_to_collect,
                    delivery.status.to_string(),
                    delivery.requires_attention,
                    delivery.courier_id,
                    delivery.account_id,
                    delivery.journey_id,
                    fmt_instant(delivery.created_at),
                    delivery.updated_at.map(fmt_instant),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Get a delivery by ID.
pub async fn get_delivery(db: &Database, id: &str) -> Result<Option<Delivery>, DespachoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DELIVERY_COLUMNS} FROM deliveries WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], delivery_from_row);
            match result {
                Ok(delivery) => Ok(Some(delivery)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// All deliveries across every account, newest first.
pub async fn list_deliveries(db: &Database) -> Result<Vec<Delivery>, DespachoError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DELIVERY_COLUMNS} FROM deliveries ORDER BY created_at DESC, id"
            ))?;
            let rows = stmt.query_map([], delivery_from_row)?;
            let mut deliveries = Vec::new();
            for row in rows {
                deliveries.push(row?);
            }
            Ok(deliveries)
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Deliveries belonging to one journey, in creation order.
pub async fn list_for_journey(
    db: &Database,
    journey_id: &str,
) -> Result<Vec<Delivery>, DespachoError> {
    let journey_id = journey_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {DELIVERY_COLUMNS} FROM deliveries
                 WHERE journey_id = ?1 ORDER BY created_at, id"
            ))?;
            let rows = stmt.query_map(params![journey_id], delivery_from_row)?;
            let mut deliveries = Vec::new();
            for row in rows {
                deliveries.push(row?);
            }
            Ok(deliveries)
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

/// Single-statement status update. `requires_attention` is merged only when
/// `Some`; the stored value is kept otherwise.
pub async fn update_status(
    db: &Database,
    id: &str,
    status: DeliveryStatus,
    requires_attention: Option<bool>,
    updated_at: DateTime<Utc>,
) -> Result<(), DespachoError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE deliveries
                 SET status = ?1,
                     requires_attention = COALESCE(?2, requires_attention),
                     updated_at = ?3
                 WHERE id = ?4",
                params![
                    status.to_string(),
                    requires_attention,
                    fmt_instant(updated_at),
                    id,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err::<rusqlite::Error>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_delivery(id: &str, created_at: &str) -> Delivery {
        Delivery {
            id: id.to_string(),
            client_name: "Padaria Pão Quente".to_string(),
            address: "Rua das Flores, 123".to_string(),
            order_label: format!("Nº {id}"),
            kind: "Entrega".to_string(),
            amount_to_collect: 15.5,
            status: DeliveryStatus::InTransit,
            requires_attention: false,
            courier_id: "c-1".to_string(),
            account_id: "u1".to_string(),
            journey_id: Some("j-1".to_string()),
            created_at: created_at.parse().unwrap(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn create_and_get_preserves_monetary_amount() {
        let (db, _dir) = setup_db().await;
        let delivery = make_delivery("d-1", "2026-02-01T08:00:00Z");

        create_delivery(&db, &delivery).await.unwrap();
        let retrieved = get_delivery(&db, "d-1").await.unwrap().unwrap();
        assert_eq!(retrieved.amount_to_collect, 15.5);
        assert_eq!(retrieved.status, DeliveryStatus::InTransit);
        assert!(!retrieved.requires_attention);
        assert_eq!(retrieved.journey_id, Some("j-1".to_string()));
        assert_eq!(retrieved.created_at, delivery.created_at);
        assert!(retrieved.updated_at.is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_delivery_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_delivery(&db, "nope").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_deliveries_newest_first() {
        let (db, _dir) = setup_db().await;
        create_delivery(&db, &make_delivery("d-old", "2026-02-01T08:00:00Z"))
            .await
            .unwrap();
        create_delivery(&db, &make_delivery("d-new", "2026-02-01T09:00:00Z"))
            .await
            .unwrap();

        let all = list_deliveries(&db).await.unwrap();
        assert_eq!(all[0].id, "d-new");
        assert_eq!(all[1].id, "d-old");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_for_journey_scopes_and_orders() {
        let (db, _dir) = setup_db().await;
        let mut other = make_delivery("d-x", "2026-02-01T08:30:00Z");
        other.journey_id = Some("j-2".to_string());

        create_delivery(&db, &make_delivery("d-2", "2026-02-01T09:00:00Z"))
            .await
            .unwrap();
        create_delivery(&db, &make_delivery("d-1", "2026-02-01T08:00:00Z"))
            .await
            .unwrap();
        create_delivery(&db, &other).await.unwrap();

        let in_journey = list_for_journey(&db, "j-1").await.unwrap();
        let ids: Vec<&str> = in_journey.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d-1", "d-2"]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_status_merges_attention_flag() {
        let (db, _dir) = setup_db().await;
        create_delivery(&db, &make_delivery("d-upd", "2026-02-01T08:00:00Z"))
            .await
            .unwrap();

        let t1: DateTime<Utc> = "2026-02-01T10:00:00Z".parse().unwrap();
        update_status(&db, "d-upd", DeliveryStatus::Completed, Some(true), t1)
            .await
            .unwrap();

        let retrieved = get_delivery(&db, "d-upd").await.unwrap().unwrap();
        assert_eq!(retrieved.status, DeliveryStatus::Completed);
        assert!(retrieved.requires_attention);
        assert_eq!(retrieved.updated_at, Some(t1));

        // A later update with None keeps the stored flag.
        let t2: DateTime<Utc> = "2026-02-01T11:00:00Z".parse().unwrap();
        update_status(&db, "d-upd", DeliveryStatus::Failed, None, t2)
            .await
            .unwrap();
        let retrieved = get_delivery(&db, "d-upd").await.unwrap().unwrap();
        assert_eq!(retrieved.status, DeliveryStatus::Failed);
        assert!(retrieved.requires_attention);
        assert_eq!(retrieved.updated_at, Some(t2));

        db.close().await.unwrap();
    }
}
