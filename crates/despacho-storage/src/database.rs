// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use despacho_core::DespachoError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations;

/// Helper to convert tokio-rusqlite errors into DespachoError::Storage.
pub(crate) fn map_tr_err<E>(e: tokio_rusqlite::Error<E>) -> DespachoError
where
    E: std::error::Error + Send + Sync + 'static,
{
    DespachoError::Storage {
        source: Box::new(e),
    }
}

/// A WAL-mode SQLite database handle with migrations applied.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, set pragmas, and run all
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, DespachoError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| DespachoError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err::<rusqlite::Error>)?;

        conn.call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(map_tr_err::<DespachoError>)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the background connection thread.
    pub async fn close(&self) -> Result<(), DespachoError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err::<rusqlite::Error>)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
