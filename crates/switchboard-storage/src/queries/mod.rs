// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules.
//!
//! Every function takes a [`Database`](crate::Database) and runs on the
//! single tokio-rusqlite writer thread.

pub mod activity;
pub mod agents;
pub mod legacy;
pub mod messages;
pub mod notifications;
pub mod read_state;
pub mod tickets;

use std::str::FromStr;

use rusqlite::types::Type;
use switchboard_core::SwitchboardError;

/// SQLite treats a negative LIMIT as "no limit".
pub(crate) fn sql_limit(limit: Option<usize>) -> i64 {
    limit
        .map(|n| i64::try_from(n).unwrap_or(i64::MAX))
        .unwrap_or(-1)
}

/// COUNT(*) results are never negative.
pub(crate) fn count_to_u64(n: i64) -> u64 {
    u64::try_from(n).unwrap_or_default()
}

/// Parse a TEXT column holding a strum-backed enum.
pub(crate) fn parse_text<T>(idx: usize, value: String) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(&value).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decode the JSON mention list column. NULL means no mentions.
pub(crate) fn decode_mentions(idx: usize, value: Option<String>) -> rusqlite::Result<Vec<String>> {
    match value {
        None => Ok(Vec::new()),
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
    }
}

/// Encode a mention list for storage. Empty lists are stored as NULL.
pub(crate) fn encode_mentions(mentions: &[String]) -> Result<Option<String>, SwitchboardError> {
    if mentions.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(mentions)
        .map(Some)
        .map_err(|e| SwitchboardError::Storage {
            source: Box::new(e),
        })
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::{TempDir, tempdir};

    use crate::database::Database;

    pub async fn setup_db() -> (Database, TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }
}
