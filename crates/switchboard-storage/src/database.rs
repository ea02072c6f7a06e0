// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use switchboard_core::SwitchboardError;
use tracing::debug;

use crate::migrations;

/// Shared handle to the Switchboard database.
///
/// Cloning is cheap; every clone talks to the same background thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and apply migrations.
    pub async fn open(path: &str) -> Result<Self, SwitchboardError> {
        Self::open_with(path, true).await
    }

    /// Open the database, choosing the journal mode explicitly.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, SwitchboardError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SwitchboardError::Storage {
                source: Box::new(e),
            })?;
        }

        // Migrations run on a short-lived synchronous connection before the
        // shared writer thread is started.
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn =
                rusqlite::Connection::open(&migrate_path).map_err(|e| SwitchboardError::Storage {
                    source: Box::new(e),
                })?;
            apply_pragmas(&conn, wal_mode).map_err(|e| SwitchboardError::Storage {
                source: Box::new(e),
            })?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| SwitchboardError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| SwitchboardError::Storage {
                source: Box::new(e),
            })?;
        conn.call(move |conn| apply_pragmas(conn, wal_mode))
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn close(&self) -> Result<(), SwitchboardError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

fn apply_pragmas(conn: &rusqlite::Connection, wal_mode: bool) -> Result<(), rusqlite::Error> {
    if wal_mode {
        // journal_mode returns a row, so it cannot go through execute_batch.
        let _mode: String = conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    }
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

/// Convert a tokio-rusqlite error into SwitchboardError::Storage.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SwitchboardError {
    SwitchboardError::Storage {
        source: Box::new(e),
    }
}
